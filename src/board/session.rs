//! Sesión del tablero
//!
//! Combina el estado local, la navegación móvil y el cliente de la API.
//! Cada interacción corre hasta el final antes de la siguiente (`&mut self`).

use tracing::{info, warn};
use uuid::Uuid;

use crate::board::carousel::Carousel;
use crate::board::columns::{BoardColumns, BoardState};
use crate::clients::{ClientError, OrdersApi};
use crate::models::{OrderStatus, ServiceOrder};
use crate::services::{build_ready_link, NotificationError, NotificationLink};

/// Resultado de mover una tarjeta
#[derive(Debug)]
pub enum TransitionOutcome {
    /// El servidor aceptó; `order` es su versión (puede ser DELIVERED)
    Success { order: ServiceOrder },
    /// No hubo request: mismo estado, orden sin sucesor o fuera del tablero
    Skipped,
    /// El servidor rechazó; el tablero volvió a `previous`
    Failure { error: ClientError, previous: ServiceOrder },
}

impl TransitionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionOutcome::Success { .. })
    }
}

pub struct BoardSession<A: OrdersApi> {
    api: A,
    state: BoardState,
    carousel: Carousel,
}

impl<A: OrdersApi> BoardSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: BoardState::new(),
            carousel: Carousel::new(),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    pub fn columns(&self) -> BoardColumns {
        self.state.columns()
    }

    /// Tarjetas de la columna activa (vista móvil)
    pub fn active_orders(&self) -> Vec<&ServiceOrder> {
        self.state.column_orders(self.carousel.active_column())
    }

    /// Traer todas las órdenes y reconstruir las columnas
    pub async fn refresh(&mut self) -> Result<BoardColumns, ClientError> {
        let orders = self.api.list_orders().await?;
        self.state.replace_all(orders);
        info!("📋 Tablero actualizado: {} órdenes activas", self.state.orders().len());
        Ok(self.state.columns())
    }

    /// Soltar una tarjeta en otra columna (escritorio)
    pub async fn drag_to(&mut self, order_id: Uuid, target: OrderStatus) -> TransitionOutcome {
        let Some(current) = self.state.get(order_id) else {
            warn!("⚠️ Orden {} no está en el tablero", order_id);
            return TransitionOutcome::Skipped;
        };

        if current.status == target {
            return TransitionOutcome::Skipped;
        }

        let version = current.version;
        let Some(previous) = self.state.apply_optimistic(order_id, target) else {
            return TransitionOutcome::Skipped;
        };

        match self.api.update_status(order_id, target, Some(version)).await {
            Ok(order) => {
                self.state.reconcile(order.clone());
                TransitionOutcome::Success { order }
            }
            Err(error) => {
                warn!(
                    "❌ Orden #{}: {} → {} rechazado: {}",
                    previous.code, previous.status, target, error
                );
                self.state.rollback(previous.clone(), target);
                TransitionOutcome::Failure { error, previous }
            }
        }
    }

    /// Botón "avanzar" de la tarjeta (móvil); usa la tabla fija de sucesores
    pub async fn advance(&mut self, order_id: Uuid) -> TransitionOutcome {
        let Some(current) = self.state.get(order_id).cloned() else {
            warn!("⚠️ Orden {} no está en el tablero", order_id);
            return TransitionOutcome::Skipped;
        };

        let Some(next) = current.status.next() else {
            return TransitionOutcome::Skipped;
        };

        match self.api.update_status(order_id, next, Some(current.version)).await {
            Ok(order) => {
                self.state.reconcile(order.clone());
                TransitionOutcome::Success { order }
            }
            Err(error) => {
                warn!(
                    "❌ Orden #{}: avanzar a {} rechazado: {}",
                    current.code, next, error
                );
                TransitionOutcome::Failure { error, previous: current }
            }
        }
    }

    /// Enlace de WhatsApp para avisar que el vehículo está listo
    pub fn notify_customer(&self, order_id: Uuid) -> Result<NotificationLink, NotificationError> {
        let order = self
            .state
            .get(order_id)
            .ok_or(NotificationError::UnknownOrder(order_id))?;
        let link = build_ready_link(order)?;
        info!("📲 Aviso de retirada listo para la orden #{}", order.code);
        Ok(link)
    }
}
