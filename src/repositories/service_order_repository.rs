use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    Customer, LineItem, NewServiceOrder, OrderStatus, ServiceOrder, StatusChange, StatusEvent,
    StatusWrite, Vehicle,
};
use crate::repositories::order_store::OrderStore;
use crate::utils::errors::AppError;

const ORDER_SELECT: &str = r#"
    SELECT
        o.id, o.company_id, o.code, o.status, o.total, o.entry_at, o.expected_exit_at,
        o.version, o.updated_at,
        c.id AS customer_id, c.name AS customer_name, c.phone AS customer_phone,
        v.id AS vehicle_id, v.plate AS vehicle_plate, v.model AS vehicle_model,
        v.color AS vehicle_color
    FROM service_orders o
    JOIN customers c ON c.id = o.customer_id
    JOIN vehicles v ON v.id = o.vehicle_id
"#;

// Fila plana del JOIN orden + cliente + vehículo
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    company_id: Uuid,
    code: i64,
    status: OrderStatus,
    total: Decimal,
    entry_at: DateTime<Utc>,
    expected_exit_at: Option<DateTime<Utc>>,
    version: i32,
    updated_at: DateTime<Utc>,
    customer_id: Uuid,
    customer_name: String,
    customer_phone: String,
    vehicle_id: Uuid,
    vehicle_plate: String,
    vehicle_model: String,
    vehicle_color: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    order_id: Uuid,
    service_name: String,
    price: Decimal,
}

impl OrderRow {
    fn into_order(self, items: Vec<LineItem>) -> ServiceOrder {
        ServiceOrder {
            id: self.id,
            company_id: self.company_id,
            code: self.code,
            status: self.status,
            customer: Customer {
                id: self.customer_id,
                name: self.customer_name,
                phone: self.customer_phone,
            },
            vehicle: Vehicle {
                id: self.vehicle_id,
                plate: self.vehicle_plate,
                model: self.vehicle_model,
                color: self.vehicle_color,
            },
            items,
            total: self.total,
            entry_at: self.entry_at,
            expected_exit_at: self.expected_exit_at,
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

/// Repositorio PostgreSQL de órdenes de servicio
pub struct ServiceOrderRepository {
    pool: PgPool,
}

impl ServiceOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<LineItem>>, AppError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, order_id, service_name, price
            FROM service_order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(LineItem {
                id: row.id,
                service_name: row.service_name,
                price: row.price,
            });
        }
        Ok(items)
    }

    async fn current_version(&self, company_id: Uuid, id: Uuid) -> Result<Option<i32>, AppError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT version FROM service_orders WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }
}

#[async_trait]
impl OrderStore for ServiceOrderRepository {
    async fn list(&self, company_id: Uuid) -> Result<Vec<ServiceOrder>, AppError> {
        let query = format!("{} WHERE o.company_id = $1 ORDER BY o.entry_at ASC, o.code ASC", ORDER_SELECT);
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items = self.load_items(&ids).await?;

        debug!("📋 {} órdenes cargadas para empresa {}", rows.len(), company_id);

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect())
    }

    async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<ServiceOrder>, AppError> {
        let query = format!("{} WHERE o.id = $1 AND o.company_id = $2", ORDER_SELECT);
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut items = self.load_items(&[row.id]).await?;
                let order_items = items.remove(&row.id).unwrap_or_default();
                Ok(Some(row.into_order(order_items)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, company_id: Uuid, order: NewServiceOrder) -> Result<ServiceOrder, AppError> {
        let total = order.total();
        let mut tx = self.pool.begin().await?;

        let (customer_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO customers (id, company_id, name, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (company_id, phone) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&order.customer.name)
        .bind(&order.customer.phone)
        .fetch_one(&mut *tx)
        .await?;

        let (vehicle_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO vehicles (id, company_id, customer_id, plate, model, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (company_id, plate) DO UPDATE
                SET customer_id = EXCLUDED.customer_id,
                    model = EXCLUDED.model,
                    color = COALESCE(EXCLUDED.color, vehicles.color)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(customer_id)
        .bind(&order.vehicle.plate)
        .bind(&order.vehicle.model)
        .bind(&order.vehicle.color)
        .fetch_one(&mut *tx)
        .await?;

        let (code,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO service_order_counters (company_id, last_code)
            VALUES ($1, 1)
            ON CONFLICT (company_id) DO UPDATE
                SET last_code = service_order_counters.last_code + 1
            RETURNING last_code
            "#,
        )
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        let order_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO service_orders (
                id, company_id, code, customer_id, vehicle_id, status, total,
                entry_at, expected_exit_at, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $8, 1, NOW(), NOW())
            "#,
        )
        .bind(order_id)
        .bind(company_id)
        .bind(code)
        .bind(customer_id)
        .bind(vehicle_id)
        .bind(OrderStatus::Awaiting)
        .bind(total)
        .bind(order.expected_exit_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO service_order_items (id, order_id, position, service_name, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(position as i32)
            .bind(&item.service_name)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("🧾 Orden #{} insertada para empresa {}", code, company_id);

        self.find(company_id, order_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Orden {} no encontrada tras crearla", order_id)))
    }

    async fn update_status(
        &self,
        company_id: Uuid,
        id: Uuid,
        change: StatusChange,
    ) -> Result<StatusWrite, AppError> {
        let mut tx = self.pool.begin().await?;

        // Estado previo bloqueado hasta el commit
        let previous: Option<(OrderStatus, i32)> = sqlx::query_as(
            "SELECT status, version FROM service_orders WHERE id = $1 AND company_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (from_status, version) = match previous {
            Some(row) => row,
            None => return Ok(StatusWrite::NotFound),
        };

        if version != change.expected_version {
            return Ok(StatusWrite::Stale { current_version: version });
        }

        let updated = sqlx::query(
            r#"
            UPDATE service_orders
            SET status = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND version = $4
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(change.to)
        .bind(change.expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return match self.current_version(company_id, id).await? {
                Some(current_version) => Ok(StatusWrite::Stale { current_version }),
                None => Ok(StatusWrite::NotFound),
            };
        }

        sqlx::query(
            r#"
            INSERT INTO service_order_status_events (id, order_id, from_status, to_status, changed_by, changed_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(from_status)
        .bind(change.to)
        .bind(change.changed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("🔄 Orden {} {} -> {}", id, from_status, change.to);

        match self.find(company_id, id).await? {
            Some(order) => Ok(StatusWrite::Applied(order)),
            None => Ok(StatusWrite::NotFound),
        }
    }

    async fn history(&self, company_id: Uuid, id: Uuid) -> Result<Vec<StatusEvent>, AppError> {
        let events = sqlx::query_as::<_, StatusEvent>(
            r#"
            SELECT e.id, e.order_id, e.from_status, e.to_status, e.changed_by, e.changed_at
            FROM service_order_status_events e
            JOIN service_orders o ON o.id = e.order_id
            WHERE e.order_id = $1 AND o.company_id = $2
            ORDER BY e.changed_at ASC
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
