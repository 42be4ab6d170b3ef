//! Routers de la API
//!
//! `create_app_router` arma el árbol completo: health público y
//! `/api/orders` detrás del middleware JWT, con rate limiting, CORS, compresión y trazas.

pub mod health_routes;
pub mod service_order_routes;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_layer_for, rate_limit_middleware};
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/orders", service_order_routes::create_service_order_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_routes::health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer_for(&state.config.cors_origins))
                .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}
