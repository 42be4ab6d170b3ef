//! Cliente HTTP para la API de órdenes
//!
//! `OrdersApi` es la costura que usa el tablero; `OrdersClient` la implementa
//! con reqwest y un token Bearer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::dto::service_order_dto::UpdateStatusRequest;
use crate::models::{OrderStatus, ServiceOrder};
use crate::utils::errors::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Error de transporte: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Respuesta inválida: {0}")]
    Decode(String),

    #[error("API respondió {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Api { status: 409, .. })
    }

    /// Código estable de la API (`VERSION_CONFLICT`, `INVALID_TRANSITION`, ...)
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Operaciones que el tablero necesita del servidor
#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, ClientError>;

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        version: Option<i32>,
    ) -> Result<ServiceOrder, ClientError>;
}

/// Cliente reqwest contra `/api/orders`
#[derive(Clone)]
pub struct OrdersClient {
    client: Client,
    base_url: String,
    token: String,
}

impl OrdersClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/orders{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()));
        }

        Err(api_error(status, &body))
    }
}

/// Convertir el cuerpo de error de la API en `ClientError::Api`
fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => ClientError::Api {
            status: status.as_u16(),
            code: error.code.unwrap_or(error.error),
            message: error.message,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: status.canonical_reason().unwrap_or("UNKNOWN").to_string(),
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl OrdersApi for OrdersClient {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, ClientError> {
        debug!("📥 GET {}", self.url(""));
        let response = self
            .client
            .get(self.url(""))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        version: Option<i32>,
    ) -> Result<ServiceOrder, ClientError> {
        let url = self.url(&format!("/{}/status", order_id));
        debug!("📤 PATCH {} -> {}", url, status);

        let response = self
            .client
            .patch(url)
            .bearer_auth(&self.token)
            .json(&UpdateStatusRequest {
                status: status.as_str().to_string(),
                version,
            })
            .send()
            .await?;

        Self::decode(response).await
    }
}
