use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewServiceOrder, ServiceOrder, StatusChange, StatusEvent, StatusWrite};
use crate::utils::errors::AppError;

/// Almacén de órdenes de servicio, siempre filtrado por empresa
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Todas las órdenes de la empresa, en orden de entrada
    async fn list(&self, company_id: Uuid) -> Result<Vec<ServiceOrder>, AppError>;

    async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<ServiceOrder>, AppError>;

    /// Crear la orden en AWAITING con código secuencial y total calculado
    async fn create(&self, company_id: Uuid, order: NewServiceOrder) -> Result<ServiceOrder, AppError>;

    /// Escritura condicional: solo aplica si la versión coincide
    async fn update_status(
        &self,
        company_id: Uuid,
        id: Uuid,
        change: StatusChange,
    ) -> Result<StatusWrite, AppError>;

    async fn history(&self, company_id: Uuid, id: Uuid) -> Result<Vec<StatusEvent>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
