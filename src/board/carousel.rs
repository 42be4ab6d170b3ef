//! Navegación móvil: una columna activa por vez
//!
//! El gesto se mide con la X del inicio y del fin del toque. Un swipe a la
//! izquierda va a la columna anterior y uno a la derecha a la siguiente;
//! en los extremos no pasa nada.

use serde::Serialize;

use crate::board::columns::BOARD_COLUMNS;
use crate::models::OrderStatus;

/// Distancia mínima en píxeles para contar como swipe
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Clasificar un gesto; `None` si no supera el umbral
pub fn detect_swipe(start_x: f64, end_x: f64) -> Option<SwipeDirection> {
    let delta = end_x - start_x;
    if delta < -SWIPE_THRESHOLD_PX {
        Some(SwipeDirection::Left)
    } else if delta > SWIPE_THRESHOLD_PX {
        Some(SwipeDirection::Right)
    } else {
        None
    }
}

#[derive(Debug, Default, Clone)]
pub struct Carousel {
    active: usize,
    touch_start_x: Option<f64>,
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_column(&self) -> OrderStatus {
        BOARD_COLUMNS[self.active]
    }

    /// Saltar directo a una columna (tabs); DELIVERED no tiene columna
    pub fn select(&mut self, status: OrderStatus) -> bool {
        match BOARD_COLUMNS.iter().position(|s| *s == status) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    pub fn previous(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn next(&mut self) {
        if self.active + 1 < BOARD_COLUMNS.len() {
            self.active += 1;
        }
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start_x = Some(x);
    }

    /// Terminar el toque y mover la columna activa si hubo swipe
    pub fn touch_end(&mut self, x: f64) -> Option<SwipeDirection> {
        let start = self.touch_start_x.take()?;
        let direction = detect_swipe(start, x)?;

        match direction {
            SwipeDirection::Left => self.previous(),
            SwipeDirection::Right => self.next(),
        }

        Some(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(carousel: &mut Carousel, from: f64, to: f64) -> Option<SwipeDirection> {
        carousel.touch_start(from);
        carousel.touch_end(to)
    }

    #[test]
    fn test_detect_swipe_threshold() {
        assert_eq!(detect_swipe(200.0, 100.0), Some(SwipeDirection::Left));
        assert_eq!(detect_swipe(100.0, 200.0), Some(SwipeDirection::Right));
        assert_eq!(detect_swipe(100.0, 150.0), None);
        assert_eq!(detect_swipe(100.0, 60.0), None);
    }

    #[test]
    fn test_swipe_moves_between_columns() {
        let mut carousel = Carousel::new();
        assert_eq!(carousel.active_column(), OrderStatus::Awaiting);

        swipe(&mut carousel, 100.0, 200.0);
        assert_eq!(carousel.active_column(), OrderStatus::Washing);

        swipe(&mut carousel, 200.0, 100.0);
        assert_eq!(carousel.active_column(), OrderStatus::Awaiting);
    }

    #[test]
    fn test_swipe_clamps_at_edges() {
        let mut carousel = Carousel::new();
        assert_eq!(swipe(&mut carousel, 300.0, 100.0), Some(SwipeDirection::Left));
        assert_eq!(carousel.active_index(), 0);

        assert!(carousel.select(OrderStatus::Ready));
        swipe(&mut carousel, 100.0, 300.0);
        assert_eq!(carousel.active_column(), OrderStatus::Ready);
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let mut carousel = Carousel::new();
        assert_eq!(carousel.touch_end(500.0), None);
        assert!(!carousel.select(OrderStatus::Delivered));
        assert_eq!(carousel.active_index(), 0);
    }
}
