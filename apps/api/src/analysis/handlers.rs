//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use crate::analysis::models::{AggregateResult, EvaluationRequest};
use crate::analysis::orchestrator::run_analysis;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, ProgressRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunAnalysisRequest {
    pub company: String,
    pub job_role: String,
    pub resume_text: String,
    /// Must reference an analysis row already created by the intake form.
    pub analysis_id: Uuid,
}

/// POST /api/v1/analyses/run
///
/// Runs the full evaluation pipeline for an existing analysis row. The caller
/// always gets either a completed result or an explicit error, never a
/// stuck state.
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    Json(request): Json<RunAnalysisRequest>,
) -> Result<Response, AppError> {
    validate(&request)?;

    let exists = state
        .store
        .analysis_exists(request.analysis_id)
        .await
        .map_err(AppError::Internal)?;
    if !exists {
        return Err(AppError::NotFound(format!(
            "Analysis {} not found",
            request.analysis_id
        )));
    }

    let eval_request = EvaluationRequest {
        analysis_id: request.analysis_id,
        company: request.company,
        job_role: request.job_role,
        resume_text: request.resume_text,
    };

    match run_analysis(state.store.as_ref(), &state.gateway, &eval_request).await {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(success_body(eval_request.analysis_id, &result)),
        )
            .into_response()),
        Err(err) => {
            error!(analysis_id = %eval_request.analysis_id, "Analysis failed: {err:#}");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_body(&format!("{err:#}"))),
            )
                .into_response())
        }
    }
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisRow>, AppError> {
    let row = state
        .store
        .get_analysis(analysis_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))?;

    Ok(Json(row))
}

/// GET /api/v1/analyses/:id/progress
///
/// Progress checkpoints for the polling observer, newest first.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<Vec<ProgressRow>>, AppError> {
    let exists = state
        .store
        .analysis_exists(analysis_id)
        .await
        .map_err(AppError::Internal)?;
    if !exists {
        return Err(AppError::NotFound(format!(
            "Analysis {analysis_id} not found"
        )));
    }

    let rows = state
        .store
        .list_progress(analysis_id)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(rows))
}

fn validate(request: &RunAnalysisRequest) -> Result<(), AppError> {
    if request.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    if request.job_role.trim().is_empty() {
        return Err(AppError::Validation("job_role cannot be empty".to_string()));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn success_body(analysis_id: Uuid, result: &AggregateResult) -> Value {
    json!({
        "success": true,
        "analysis_id": analysis_id,
        "final_score": result.final_score,
        "display_score": result.display_score,
        "ideal_resume": result.ideal_resume,
        "evaluations": result.evaluations,
    })
}

fn error_body(message: &str) -> Value {
    json!({
        "success": false,
        "error": message,
    })
}
