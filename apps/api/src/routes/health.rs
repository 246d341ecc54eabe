use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvtool"
    }))
}

/// GET /acerca
pub async fn about_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "cvtool",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal CV editor with selectable Markdown and text exports",
        "data_dir": state.config.data_dir.display().to_string()
    }))
}
