//! Almacén en memoria de órdenes
//!
//! Usado para el modo demo local (`ORDER_STORE=memory`) y en los tests.
//! Mantiene las mismas reglas que el repositorio PostgreSQL: código
//! secuencial por empresa, versión condicional y eventos de auditoría.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Customer, LineItem, NewServiceOrder, OrderStatus, ServiceOrder, StatusChange, StatusEvent,
    StatusWrite, Vehicle,
};
use crate::repositories::order_store::OrderStore;
use crate::utils::errors::AppError;

#[derive(Default)]
struct Inner {
    orders: Vec<ServiceOrder>,
    counters: HashMap<Uuid, i64>,
    events: Vec<StatusEvent>,
}

#[derive(Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list(&self, company_id: Uuid) -> Result<Vec<ServiceOrder>, AppError> {
        let inner = self.inner.read().await;
        let mut orders: Vec<ServiceOrder> = inner
            .orders
            .iter()
            .filter(|o| o.company_id == company_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.entry_at.cmp(&b.entry_at).then(a.code.cmp(&b.code)));
        Ok(orders)
    }

    async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<ServiceOrder>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .iter()
            .find(|o| o.id == id && o.company_id == company_id)
            .cloned())
    }

    async fn create(&self, company_id: Uuid, order: NewServiceOrder) -> Result<ServiceOrder, AppError> {
        let mut inner = self.inner.write().await;
        let total = order.total();

        let counter = inner.counters.entry(company_id).or_insert(0);
        *counter += 1;
        let code = *counter;

        // Reutilizar cliente y vehículo ya conocidos, como hace el upsert SQL
        let customer_id = inner
            .orders
            .iter()
            .find(|o| o.company_id == company_id && o.customer.phone == order.customer.phone)
            .map(|o| o.customer.id)
            .unwrap_or_else(Uuid::new_v4);
        let vehicle_id = inner
            .orders
            .iter()
            .find(|o| o.company_id == company_id && o.vehicle.plate == order.vehicle.plate)
            .map(|o| o.vehicle.id)
            .unwrap_or_else(Uuid::new_v4);

        for existing in inner.orders.iter_mut().filter(|o| o.company_id == company_id) {
            if existing.customer.id == customer_id {
                existing.customer.name = order.customer.name.clone();
            }
            if existing.vehicle.id == vehicle_id {
                existing.vehicle.model = order.vehicle.model.clone();
                if order.vehicle.color.is_some() {
                    existing.vehicle.color = order.vehicle.color.clone();
                }
            }
        }

        let now = Utc::now();
        let created = ServiceOrder {
            id: Uuid::new_v4(),
            company_id,
            code,
            status: OrderStatus::Awaiting,
            customer: Customer {
                id: customer_id,
                name: order.customer.name,
                phone: order.customer.phone,
            },
            vehicle: Vehicle {
                id: vehicle_id,
                plate: order.vehicle.plate,
                model: order.vehicle.model,
                color: order.vehicle.color,
            },
            items: order
                .items
                .into_iter()
                .map(|item| LineItem {
                    id: Uuid::new_v4(),
                    service_name: item.service_name,
                    price: item.price,
                })
                .collect(),
            total,
            entry_at: now,
            expected_exit_at: order.expected_exit_at,
            version: 1,
            updated_at: now,
        };

        inner.orders.push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        company_id: Uuid,
        id: Uuid,
        change: StatusChange,
    ) -> Result<StatusWrite, AppError> {
        let mut inner = self.inner.write().await;

        let order = match inner
            .orders
            .iter_mut()
            .find(|o| o.id == id && o.company_id == company_id)
        {
            Some(order) => order,
            None => return Ok(StatusWrite::NotFound),
        };

        if order.version != change.expected_version {
            return Ok(StatusWrite::Stale { current_version: order.version });
        }

        let from_status = order.status;
        let now = Utc::now();
        order.status = change.to;
        order.version += 1;
        order.updated_at = now;
        let updated = order.clone();

        inner.events.push(StatusEvent {
            id: Uuid::new_v4(),
            order_id: id,
            from_status,
            to_status: change.to,
            changed_by: change.changed_by,
            changed_at: now,
        });

        Ok(StatusWrite::Applied(updated))
    }

    async fn history(&self, company_id: Uuid, id: Uuid) -> Result<Vec<StatusEvent>, AppError> {
        let inner = self.inner.read().await;
        let owned = inner.orders.iter().any(|o| o.id == id && o.company_id == company_id);
        if !owned {
            return Ok(Vec::new());
        }
        Ok(inner.events.iter().filter(|e| e.order_id == id).cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
