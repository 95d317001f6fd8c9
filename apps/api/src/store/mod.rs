//! Analysis store — the progress/result sink behind the pipeline.
//!
//! The orchestrator only sees the [`AnalysisStore`] trait: an append-only
//! progress log plus a single result update per analysis. `PgAnalysisStore`
//! is the production implementation; `MemoryAnalysisStore` is the test
//! double, with switchable write-failure injection for the fatal-path tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::models::{AggregateResult, ProgressStatus};
use crate::models::analysis::{AnalysisRow, ProgressRow};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Whether the caller-supplied analysis id references an existing row.
    async fn analysis_exists(&self, analysis_id: Uuid) -> Result<bool>;

    async fn get_analysis(&self, analysis_id: Uuid) -> Result<Option<AnalysisRow>>;

    /// Appends one progress checkpoint. Never updates existing rows.
    async fn append_progress(
        &self,
        analysis_id: Uuid,
        step: &str,
        progress: i32,
        status: ProgressStatus,
        message: &str,
    ) -> Result<()>;

    /// Writes the final result onto the analysis row. Called exactly once
    /// per completed run.
    async fn update_analysis(&self, analysis_id: Uuid, result: &AggregateResult) -> Result<()>;

    /// Progress rows for one analysis, newest first.
    async fn list_progress(&self, analysis_id: Uuid) -> Result<Vec<ProgressRow>>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn analysis_exists(&self, analysis_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resume_analyses WHERE id = $1)")
                .bind(analysis_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn get_analysis(&self, analysis_id: Uuid) -> Result<Option<AnalysisRow>> {
        let row = sqlx::query_as::<_, AnalysisRow>("SELECT * FROM resume_analyses WHERE id = $1")
            .bind(analysis_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn append_progress(
        &self,
        analysis_id: Uuid,
        step: &str,
        progress: i32,
        status: ProgressStatus,
        message: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO analysis_progress (analysis_id, step, progress, status, message) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(analysis_id)
        .bind(step)
        .bind(progress)
        .bind(status.as_str())
        .bind(message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_analysis(&self, analysis_id: Uuid, result: &AggregateResult) -> Result<()> {
        let analysis_data = serde_json::to_value(result)?;

        let updated = sqlx::query(
            "UPDATE resume_analyses \
             SET ideal_resume = $2, final_score = $3, display_score = $4, \
                 analysis_data = $5, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(analysis_id)
        .bind(&result.ideal_resume)
        .bind(result.final_score)
        .bind(result.display_score)
        .bind(analysis_data)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(anyhow!("analysis {analysis_id} not found for result update"));
        }
        Ok(())
    }

    async fn list_progress(&self, analysis_id: Uuid) -> Result<Vec<ProgressRow>> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            "SELECT * FROM analysis_progress WHERE analysis_id = $1 ORDER BY created_at DESC",
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation (tests)
// ────────────────────────────────────────────────────────────────────────────

/// In-memory store for orchestrator and handler tests. Records every call
/// and can be told to fail progress or result writes.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryAnalysisStore {
    analyses: Mutex<HashMap<Uuid, AnalysisRow>>,
    progress: Mutex<Vec<ProgressRow>>,
    fail_progress_writes: Mutex<bool>,
    fail_result_writes: Mutex<bool>,
}

#[allow(dead_code)]
impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an analysis row as the intake form would have created it.
    pub fn insert_analysis(&self, analysis_id: Uuid) {
        let now = Utc::now();
        self.analyses.lock().unwrap().insert(
            analysis_id,
            AnalysisRow {
                id: analysis_id,
                company: String::new(),
                job_role: String::new(),
                resume_text: String::new(),
                ideal_resume: None,
                final_score: None,
                display_score: None,
                analysis_data: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn set_fail_progress_writes(&self, fail: bool) {
        *self.fail_progress_writes.lock().unwrap() = fail;
    }

    pub fn set_fail_result_writes(&self, fail: bool) {
        *self.fail_result_writes.lock().unwrap() = fail;
    }

    /// Progress rows in insertion order (unlike `list_progress`, which is
    /// newest first), convenient for asserting on emission order.
    pub fn recorded_progress(&self, analysis_id: Uuid) -> Vec<ProgressRow> {
        self.progress
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.analysis_id == analysis_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn analysis_exists(&self, analysis_id: Uuid) -> Result<bool> {
        Ok(self.analyses.lock().unwrap().contains_key(&analysis_id))
    }

    async fn get_analysis(&self, analysis_id: Uuid) -> Result<Option<AnalysisRow>> {
        Ok(self.analyses.lock().unwrap().get(&analysis_id).cloned())
    }

    async fn append_progress(
        &self,
        analysis_id: Uuid,
        step: &str,
        progress: i32,
        status: ProgressStatus,
        message: &str,
    ) -> Result<()> {
        if *self.fail_progress_writes.lock().unwrap() {
            return Err(anyhow!("injected progress write failure"));
        }
        self.progress.lock().unwrap().push(ProgressRow {
            id: Uuid::new_v4(),
            analysis_id,
            step: step.to_string(),
            progress,
            status: status.as_str().to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_analysis(&self, analysis_id: Uuid, result: &AggregateResult) -> Result<()> {
        if *self.fail_result_writes.lock().unwrap() {
            return Err(anyhow!("injected result write failure"));
        }
        let mut analyses = self.analyses.lock().unwrap();
        let row = analyses
            .get_mut(&analysis_id)
            .ok_or_else(|| anyhow!("analysis {analysis_id} not found for result update"))?;
        row.ideal_resume = Some(result.ideal_resume.clone());
        row.final_score = Some(result.final_score);
        row.display_score = Some(result.display_score);
        row.analysis_data = Some(serde_json::to_value(result)?);
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn list_progress(&self, analysis_id: Uuid) -> Result<Vec<ProgressRow>> {
        let mut rows = self.recorded_progress(analysis_id);
        rows.reverse();
        Ok(rows)
    }
}
