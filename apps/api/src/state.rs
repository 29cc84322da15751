use std::sync::Arc;

use crate::config::Config;
use crate::parsing::generator::RecordGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Owns the LLM client (as `Arc<dyn CompletionProvider>`) built at startup.
    pub generator: Arc<RecordGenerator>,
    pub config: Config,
}
