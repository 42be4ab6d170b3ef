use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

/// Liveness + ping al almacén de órdenes
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!("❌ Health check: almacén no disponible: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "healthy" } else { "degraded" },
            "service": "lavajato-backend",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "transition_policy": state.transition_policy.as_str(),
            "store": store,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
