use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::board::columns::{partition_active, BoardColumns};
use crate::dto::service_order_dto::{
    AllowedTransitionsResponse, CreateServiceOrderRequest, StatusHistoryResponse,
    UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::auth::AuthenticatedUser;
use crate::models::{NewServiceOrder, OrderStatus, ServiceOrder, StatusChange, StatusWrite};
use crate::repositories::OrderStore;
use crate::services::TransitionPolicy;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct ServiceOrderController {
    store: Arc<dyn OrderStore>,
    policy: TransitionPolicy,
}

impl ServiceOrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            policy: state.transition_policy,
        }
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<ServiceOrder>, AppError> {
        self.store.list(company_id).await
    }

    /// Partición por columnas del lado del servidor
    pub async fn board(&self, company_id: Uuid) -> Result<BoardColumns, AppError> {
        let orders = self.store.list(company_id).await?;
        Ok(partition_active(orders.iter()))
    }

    pub async fn get_by_id(&self, company_id: Uuid, id: Uuid) -> Result<ServiceOrder, AppError> {
        self.store
            .find(company_id, id)
            .await?
            .ok_or_else(|| not_found_error("Orden de servicio", &id.to_string()))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateServiceOrderRequest,
    ) -> Result<ApiResponse<ServiceOrder>, AppError> {
        request.validate()?;

        let new_order = NewServiceOrder::from(request);
        let order = self.store.create(user.company_id, new_order).await?;

        info!(
            "🧾 Orden #{} creada ({} / {}) total {}",
            order.code, order.customer.name, order.vehicle.plate, order.total
        );

        Ok(ApiResponse::success_with_message(
            order,
            "Orden de servicio creada exitosamente".to_string(),
        ))
    }

    /// Transición de estado con control de versión y tabla de transiciones
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateStatusRequest,
    ) -> Result<ServiceOrder, AppError> {
        let target = request
            .status
            .parse::<OrderStatus>()
            .map_err(|e| bad_request_error(&e.to_string()))?;

        let current = self.get_by_id(user.company_id, id).await?;

        if let Some(expected) = request.version {
            if expected != current.version {
                warn!(
                    "⚠️ Orden #{}: versión {} obsoleta (actual {})",
                    current.code, expected, current.version
                );
                return Err(AppError::VersionConflict {
                    expected,
                    current: current.version,
                });
            }
        }

        self.policy.check(current.status, target)?;

        let change = StatusChange {
            to: target,
            expected_version: current.version,
            changed_by: Some(user.user_id),
        };

        match self.store.update_status(user.company_id, id, change).await? {
            StatusWrite::Applied(order) => {
                info!(
                    "🔄 Orden #{}: {} → {} (v{})",
                    order.code, current.status, order.status, order.version
                );
                Ok(order)
            }
            StatusWrite::NotFound => Err(not_found_error("Orden de servicio", &id.to_string())),
            StatusWrite::Stale { current_version } => {
                warn!(
                    "⚠️ Orden #{}: escritura concurrente, versión actual {}",
                    current.code, current_version
                );
                Err(AppError::VersionConflict {
                    expected: current.version,
                    current: current_version,
                })
            }
        }
    }

    pub async fn history(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<ApiResponse<StatusHistoryResponse>, AppError> {
        let order = self.get_by_id(company_id, id).await?;
        let events = self.store.history(company_id, order.id).await?;

        Ok(ApiResponse::success(StatusHistoryResponse {
            order_id: order.id,
            events,
        }))
    }

    pub async fn allowed_transitions(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<AllowedTransitionsResponse, AppError> {
        let order = self.get_by_id(company_id, id).await?;

        Ok(AllowedTransitionsResponse {
            policy: self.policy.as_str(),
            from: order.status,
            targets: self.policy.targets(order.status),
        })
    }
}
