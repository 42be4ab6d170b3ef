//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El almacén de órdenes se inyecta como
//! trait object para poder usar PostgreSQL o memoria.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::OrderStore;
use crate::services::TransitionPolicy;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitState,
    pub transition_policy: TransitionPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn OrderStore>, config: EnvironmentConfig) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            transition_policy: config.transition_policy,
            store,
            config,
        }
    }
}
