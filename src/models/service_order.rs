//! Modelo de ServiceOrder
//!
//! Este módulo contiene la orden de servicio del lava-jato, su estado dentro
//! del pipeline (AWAITING → WASHING → FINISHING → READY → DELIVERED) y las
//! asociaciones con cliente, vehículo e items.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Estado de la orden - mapea al ENUM service_order_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "service_order_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Awaiting,
    Washing,
    Finishing,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// Secuencia fija del pipeline
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Awaiting,
        OrderStatus::Washing,
        OrderStatus::Finishing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Awaiting => "AWAITING",
            OrderStatus::Washing => "WASHING",
            OrderStatus::Finishing => "FINISHING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    /// Posición dentro de la secuencia (0 = AWAITING)
    pub fn rank(&self) -> usize {
        match self {
            OrderStatus::Awaiting => 0,
            OrderStatus::Washing => 1,
            OrderStatus::Finishing => 2,
            OrderStatus::Ready => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Siguiente estado en la tabla fija; DELIVERED no tiene sucesor
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Awaiting => Some(OrderStatus::Washing),
            OrderStatus::Washing => Some(OrderStatus::Finishing),
            OrderStatus::Finishing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error al parsear un estado desconocido
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Estado desconocido: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AWAITING" => Ok(OrderStatus::Awaiting),
            "WASHING" => Ok(OrderStatus::Washing),
            "FINISHING" => Ok(OrderStatus::Finishing),
            "READY" => Ok(OrderStatus::Ready),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Cliente asociado a la orden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

impl Customer {
    /// Primer nombre (texto antes del primer espacio)
    pub fn first_name(&self) -> &str {
        self.name.trim().split(' ').next().unwrap_or_default()
    }
}

/// Vehículo asociado a la orden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub model: String,
    pub color: Option<String>,
}

/// Item de servicio (lavagem simples, polimento, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub service_name: String,
    pub price: Decimal,
}

/// Orden de servicio completa con sus asociaciones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub company_id: Uuid,
    pub code: i64,
    pub status: OrderStatus,
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub entry_at: DateTime<Utc>,
    pub expected_exit_at: Option<DateTime<Utc>>,
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn is_delivered(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Suma de precios de los items
pub fn items_total<'a, I>(prices: I) -> Decimal
where
    I: IntoIterator<Item = &'a Decimal>,
{
    prices.into_iter().copied().sum()
}

/// Datos de cliente para una nueva orden
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
}

/// Datos de vehículo para una nueva orden
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub plate: String,
    pub model: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub service_name: String,
    pub price: Decimal,
}

/// Orden lista para persistir (ya validada)
#[derive(Debug, Clone)]
pub struct NewServiceOrder {
    pub customer: NewCustomer,
    pub vehicle: NewVehicle,
    pub items: Vec<NewLineItem>,
    pub expected_exit_at: Option<DateTime<Utc>>,
}

impl NewServiceOrder {
    pub fn total(&self) -> Decimal {
        items_total(self.items.iter().map(|item| &item.price))
    }
}

/// Cambio de estado solicitado sobre una orden
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub to: OrderStatus,
    pub expected_version: i32,
    pub changed_by: Option<Uuid>,
}

/// Resultado de una escritura condicional de estado
#[derive(Debug, Clone)]
pub enum StatusWrite {
    Applied(ServiceOrder),
    NotFound,
    Stale { current_version: i32 },
}

/// Registro de auditoría de una transición
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusEvent {
    pub id: Uuid,
    pub order_id: Uuid,
    pub from_status: OrderStatus,
    pub to_status: OrderStatus,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}
