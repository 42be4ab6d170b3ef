//! Tablero de órdenes (lado cliente)
//!
//! Columnas por estado, navegación móvil y la sesión que aplica cambios
//! optimistas contra la API.

pub mod carousel;
pub mod columns;
pub mod session;

pub use carousel::{Carousel, SwipeDirection, SWIPE_THRESHOLD_PX};
pub use columns::{BoardColumn, BoardColumns, BoardState, BOARD_COLUMNS};
pub use session::{BoardSession, TransitionOutcome};
