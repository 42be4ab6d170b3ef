//! Columnas del tablero y estado local de las órdenes
//!
//! `BoardState` es la copia local que pinta el tablero. Las órdenes DELIVERED
//! nunca entran en la partición por columnas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{OrderStatus, ServiceOrder};

/// Columnas visibles, en el orden fijo del pipeline
pub const BOARD_COLUMNS: [OrderStatus; 4] = [
    OrderStatus::Awaiting,
    OrderStatus::Washing,
    OrderStatus::Finishing,
    OrderStatus::Ready,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub status: OrderStatus,
    pub orders: Vec<ServiceOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumns {
    pub columns: Vec<BoardColumn>,
}

impl BoardColumns {
    pub fn column(&self, status: OrderStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn contains(&self, order_id: Uuid) -> bool {
        self.columns
            .iter()
            .any(|c| c.orders.iter().any(|o| o.id == order_id))
    }

    pub fn total_orders(&self) -> usize {
        self.columns.iter().map(|c| c.orders.len()).sum()
    }
}

/// Agrupar órdenes activas por estado, descartando DELIVERED
pub fn partition_active<'a, I>(orders: I) -> BoardColumns
where
    I: IntoIterator<Item = &'a ServiceOrder>,
{
    let mut columns: Vec<BoardColumn> = BOARD_COLUMNS
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            orders: Vec::new(),
        })
        .collect();

    for order in orders {
        if let Some(column) = columns.iter_mut().find(|c| c.status == order.status) {
            column.orders.push(order.clone());
        }
    }

    BoardColumns { columns }
}

/// Copia local de las órdenes del tablero
#[derive(Debug, Default, Clone)]
pub struct BoardState {
    orders: Vec<ServiceOrder>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reemplazar todo con lo que vino del servidor (sin DELIVERED)
    pub fn replace_all(&mut self, orders: Vec<ServiceOrder>) {
        self.orders = orders.into_iter().filter(|o| !o.is_delivered()).collect();
    }

    pub fn orders(&self) -> &[ServiceOrder] {
        &self.orders
    }

    pub fn get(&self, order_id: Uuid) -> Option<&ServiceOrder> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn columns(&self) -> BoardColumns {
        partition_active(self.orders.iter())
    }

    pub fn column_orders(&self, status: OrderStatus) -> Vec<&ServiceOrder> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    /// Aplicar el nuevo estado antes de la respuesta del servidor.
    /// Devuelve la orden previa para poder revertir.
    pub fn apply_optimistic(&mut self, order_id: Uuid, status: OrderStatus) -> Option<ServiceOrder> {
        let order = self.orders.iter_mut().find(|o| o.id == order_id)?;
        let previous = order.clone();
        order.status = status;
        Some(previous)
    }

    /// Incorporar la versión del servidor; DELIVERED sale del tablero
    pub fn reconcile(&mut self, order: ServiceOrder) {
        if order.is_delivered() {
            self.remove(order.id);
            return;
        }

        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }

    /// Revertir una actualización optimista fallida.
    /// Solo revierte si la orden sigue con el estado que pusimos nosotros.
    pub fn rollback(&mut self, previous: ServiceOrder, attempted: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| o.id == previous.id) {
            Some(existing) if existing.status == attempted => {
                *existing = previous;
                true
            }
            Some(_) => false,
            None => false,
        }
    }

    pub fn remove(&mut self, order_id: Uuid) -> Option<ServiceOrder> {
        let index = self.orders.iter().position(|o| o.id == order_id)?;
        Some(self.orders.remove(index))
    }
}
