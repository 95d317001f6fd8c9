use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One submitted analysis. Created by the intake form before the pipeline
/// runs; the result columns are filled in exactly once at finalize.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub company: String,
    pub job_role: String,
    pub resume_text: String,
    pub ideal_resume: Option<String>,
    pub final_score: Option<f64>,
    pub display_score: Option<f64>,
    pub analysis_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One progress checkpoint. Append-only: rows are never mutated or deleted;
/// the observer reads latest-by-time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub step: String,
    pub progress: i32,
    pub status: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
