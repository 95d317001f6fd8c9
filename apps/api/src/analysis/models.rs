//! Data model for one analysis run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::{BackendError, BackendId};

/// Inputs to one analysis. Created once per request, read-only afterward.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub analysis_id: Uuid,
    pub company: String,
    pub job_role: String,
    pub resume_text: String,
}

/// One backend's unparsed evaluation outcome. Produced by the gateway fan-out,
/// consumed exactly once by the parser.
#[derive(Debug)]
pub struct RawEvaluation {
    pub backend: BackendId,
    pub outcome: Result<String, BackendError>,
}

/// Structured evaluation derived from one successful backend response.
/// Parsing is total: malformed text yields fallback fields, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedEvaluation {
    pub backend: BackendId,
    pub score: u32,
    pub gaps: String,
    pub missing_keywords: String,
    pub recommendations: String,
}

/// Final combined result of one analysis. Computed once, immutable after.
///
/// `evaluations` keeps backend invocation order (never re-sorted by score)
/// so per-model attribution is stable for display.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub final_score: f64,
    pub display_score: f64,
    pub ideal_resume: String,
    pub evaluations: Vec<ParsedEvaluation>,
}

/// Status carried by a progress event. The terminal event of a run is exactly
/// one of `Completed` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    InProgress,
    Completed,
    Error,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_status_serde_matches_as_str() {
        for status in [
            ProgressStatus::InProgress,
            ProgressStatus::Completed,
            ProgressStatus::Error,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_parsed_evaluation_serializes_backend_attribution() {
        let parsed = ParsedEvaluation {
            backend: BackendId::new("gemini"),
            score: 82,
            gaps: "a,b".to_string(),
            missing_keywords: "x".to_string(),
            recommendations: "y".to_string(),
        };
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["backend"], "gemini");
        assert_eq!(value["score"], 82);
    }
}
