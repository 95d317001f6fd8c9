use std::sync::Arc;

use crate::gateway::ModelGateway;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Progress/result sink. Trait object so tests can swap in the in-memory store.
    pub store: Arc<dyn AnalysisStore>,
    pub gateway: Arc<ModelGateway>,
}
