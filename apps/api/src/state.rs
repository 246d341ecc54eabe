use std::sync::Arc;

use crate::config::Config;
use crate::store::CvStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no cached CV data: every request loads what it needs from the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CvStore>,
    pub config: Config,
}
