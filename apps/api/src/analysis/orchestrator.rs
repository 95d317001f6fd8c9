//! Evaluation orchestrator — owns the analysis pipeline.
//!
//! Flow: preparing → generate ideal resume → fan out evaluation to every
//! backend → parse → aggregate → persist → complete, with one progress
//! checkpoint per milestone (0/25/50/75/100).
//!
//! Failure model: backend-call and parse failures are recovered locally and
//! never abort the run, even when every backend fails. Store failures are
//! fatal: the run transitions to a terminal `error` event and surfaces the
//! failure to the caller, with no partial result persisted.

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::aggregator::aggregate;
use crate::analysis::models::{
    AggregateResult, EvaluationRequest, ParsedEvaluation, ProgressStatus, RawEvaluation,
};
use crate::analysis::parser::parse_evaluation;
use crate::analysis::prompts::{build_evaluation_prompt, build_ideal_resume_prompt};
use crate::gateway::ModelGateway;
use crate::store::AnalysisStore;

/// Placeholder used when every backend fails to produce an ideal resume.
pub const IDEAL_RESUME_FALLBACK: &str =
    "Unable to generate ideal resume - API connection failed";

/// Runs one full analysis. On a fatal error a terminal `error` progress event
/// is emitted (best-effort) before the failure is returned to the caller.
pub async fn run_analysis(
    store: &dyn AnalysisStore,
    gateway: &ModelGateway,
    request: &EvaluationRequest,
) -> Result<AggregateResult> {
    let mut reporter = ProgressReporter::new(store, request.analysis_id);

    match run_pipeline(store, gateway, request, &mut reporter).await {
        Ok(result) => Ok(result),
        Err(err) => {
            // Best-effort: if the store itself is down this write fails too,
            // and the pipeline error still wins.
            if let Err(progress_err) = reporter.error(&format!("{err:#}")).await {
                warn!("Failed to record error progress event: {progress_err:#}");
            }
            Err(err)
        }
    }
}

async fn run_pipeline(
    store: &dyn AnalysisStore,
    gateway: &ModelGateway,
    request: &EvaluationRequest,
    reporter: &mut ProgressReporter<'_>,
) -> Result<AggregateResult> {
    info!(
        analysis_id = %request.analysis_id,
        company = %request.company,
        job_role = %request.job_role,
        "Starting analysis"
    );

    reporter
        .advance(0, "preparing", "Preparing analysis...")
        .await?;

    reporter
        .advance(
            25,
            "generating_ideal_resume",
            "Generating ideal resume benchmark...",
        )
        .await?;
    let ideal_resume =
        generate_ideal_resume(gateway, &request.company, &request.job_role).await;

    reporter
        .advance(50, "evaluating_resume", "Multi-AI evaluation in progress...")
        .await?;
    let evaluation_prompt = build_evaluation_prompt(
        &request.resume_text,
        &ideal_resume,
        &request.company,
        &request.job_role,
    );
    let raw_evaluations = evaluate_all(gateway, &evaluation_prompt).await;

    reporter
        .advance(75, "calculating_scores", "Calculating final scores...")
        .await?;
    let parsed = parse_successful(raw_evaluations);
    let result = aggregate(ideal_resume, parsed);
    info!(
        analysis_id = %request.analysis_id,
        final_score = result.final_score,
        evaluations = result.evaluations.len(),
        "Scores aggregated"
    );

    store
        .update_analysis(request.analysis_id, &result)
        .await
        .context("failed to persist analysis result")?;

    reporter.completed("Analysis complete!").await?;
    info!(analysis_id = %request.analysis_id, "Analysis completed successfully");

    Ok(result)
}

/// Generates the reference resume by walking the backends in configured
/// priority order: the first success wins. This is a fallback chain, not a
/// fan-out; only the evaluation step queries every backend.
async fn generate_ideal_resume(gateway: &ModelGateway, company: &str, job_role: &str) -> String {
    let prompt = build_ideal_resume_prompt(company, job_role);

    for backend in gateway.backends() {
        match backend.generate(&prompt).await {
            Ok(text) => {
                info!(backend = %backend.id(), "Ideal resume generated");
                return text;
            }
            Err(err) => {
                warn!(backend = %backend.id(), "Ideal resume generation failed: {err}");
            }
        }
    }

    warn!("All backends failed to generate an ideal resume; using placeholder");
    IDEAL_RESUME_FALLBACK.to_string()
}

/// Sends the identical evaluation prompt to every configured backend
/// concurrently and collects one outcome per backend, in configured order.
/// A slow or failing backend only delays its own slot.
async fn evaluate_all(gateway: &ModelGateway, prompt: &str) -> Vec<RawEvaluation> {
    let calls = gateway.backends().iter().map(|backend| async move {
        RawEvaluation {
            backend: backend.id(),
            outcome: backend.generate(prompt).await,
        }
    });

    join_all(calls).await
}

/// Parses every successful raw evaluation; failed calls are logged and
/// excluded from aggregation.
fn parse_successful(raw_evaluations: Vec<RawEvaluation>) -> Vec<ParsedEvaluation> {
    raw_evaluations
        .into_iter()
        .filter_map(|raw| match raw.outcome {
            Ok(text) => Some(parse_evaluation(raw.backend, &text)),
            Err(err) => {
                warn!(backend = %raw.backend, "Evaluation failed, excluded from aggregation: {err}");
                None
            }
        })
        .collect()
}

/// Emits progress checkpoints with monotonically non-decreasing percentages.
struct ProgressReporter<'a> {
    store: &'a dyn AnalysisStore,
    analysis_id: Uuid,
    percent: i32,
}

impl<'a> ProgressReporter<'a> {
    fn new(store: &'a dyn AnalysisStore, analysis_id: Uuid) -> Self {
        Self {
            store,
            analysis_id,
            percent: 0,
        }
    }

    async fn advance(&mut self, percent: i32, step: &str, message: &str) -> Result<()> {
        self.percent = self.percent.max(percent);
        self.store
            .append_progress(
                self.analysis_id,
                step,
                self.percent,
                ProgressStatus::InProgress,
                message,
            )
            .await
            .with_context(|| format!("failed to record progress at step '{step}'"))
    }

    async fn completed(&mut self, message: &str) -> Result<()> {
        self.percent = 100;
        self.store
            .append_progress(
                self.analysis_id,
                "complete",
                self.percent,
                ProgressStatus::Completed,
                message,
            )
            .await
            .context("failed to record completion")
    }

    /// Terminal error event at the last reached milestone.
    async fn error(&mut self, message: &str) -> Result<()> {
        self.store
            .append_progress(
                self.analysis_id,
                "error",
                self.percent,
                ProgressStatus::Error,
                message,
            )
            .await
    }
}
