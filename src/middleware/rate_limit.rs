//! Middleware de Rate Limiting
//!
//! Este módulo maneja la limitación de requests por IP en una ventana fija.
//! La IP es la del peer TCP; `x-forwarded-for` solo cuenta detrás de un
//! proxy de confianza (`TRUST_FORWARDED_FOR=true`).

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Contadores por IP compartidos entre requests
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_forwarded_for: bool,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window))
            .trust_forwarded_for(config.trust_forwarded_for)
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_forwarded_for: false,
        }
    }

    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Clave del cliente: x-forwarded-for (si se confía en el proxy) o el peer TCP
    pub fn client_ip(&self, request: &Request) -> String {
        if self.trust_forwarded_for {
            if let Some(ip) = forwarded_ip(request) {
                return ip;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

fn forwarded_ip(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = state.rate_limit.client_ip(&request);

    if let Err(err) = state.rate_limit.check_rate_limit(&ip).await {
        warn!("🚦 Rate limit excedido para {}", ip);
        return Err(err);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/health");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn test_client_ip_uses_peer_address() {
        let state = RateLimitState::with_limits(10, Duration::from_secs(60));

        assert_eq!(state.client_ip(&request_from("10.0.0.7:5123", None)), "10.0.0.7");
        assert_eq!(
            state.client_ip(&request_from("10.0.0.7:5123", Some("203.0.113.9"))),
            "10.0.0.7"
        );
    }

    #[test]
    fn test_client_ip_trusts_forwarded_header_when_enabled() {
        let state = RateLimitState::with_limits(10, Duration::from_secs(60)).trust_forwarded_for(true);

        assert_eq!(
            state.client_ip(&request_from("10.0.0.1:80", Some("203.0.113.9, 10.0.0.1"))),
            "203.0.113.9"
        );
        assert_eq!(state.client_ip(&request_from("10.0.0.1:80", None)), "10.0.0.1");
    }

    #[tokio::test]
    async fn test_limit_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_expires() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
