use std::sync::Arc;

use crate::config::Config;
use crate::scoring::screener::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable screener. Default: RuleBasedScreener over the startup tables.
    pub screener: Arc<dyn Screener>,
}
