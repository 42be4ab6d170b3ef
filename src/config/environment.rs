//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::services::status_transition_service::TransitionPolicy;

/// Errores al leer la configuración
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Backend de almacenamiento de órdenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub trust_forwarded_for: bool,
    pub transition_policy: TransitionPolicy,
    pub order_store: StoreBackend,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            database_url: None,
            jwt_secret: "dev-secret-change-me".to_string(),
            jwt_expiration: 86400,
            cors_origins: Vec::new(),
            rate_limit_requests: 120,
            rate_limit_window: 60,
            trust_forwarded_for: false,
            transition_policy: TransitionPolicy::default(),
            order_store: StoreBackend::Postgres,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_production = environment == "production";

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if is_production => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => defaults.jwt_secret,
        };

        let order_store = parse_or("ORDER_STORE", &lookup, defaults.order_store)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if order_store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            port: parse_or("PORT", &lookup, defaults.port)?,
            host: lookup("HOST").unwrap_or(defaults.host),
            database_url,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", &lookup, defaults.jwt_expiration)?,
            cors_origins,
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", &lookup, defaults.rate_limit_requests)?,
            rate_limit_window: parse_or("RATE_LIMIT_WINDOW", &lookup, defaults.rate_limit_window)?,
            trust_forwarded_for: parse_or("TRUST_FORWARDED_FOR", &lookup, defaults.trust_forwarded_for)?,
            transition_policy: parse_or("TRANSITION_POLICY", &lookup, defaults.transition_policy)?,
            order_store,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
