//! Services module
//!
//! Este módulo contiene la lógica de negocio que no depende de HTTP:
//! la tabla de transiciones, los permisos por rol y el aviso por WhatsApp.

pub mod authorization_service;
pub mod notification_service;
pub mod status_transition_service;

pub use notification_service::{build_ready_link, NotificationError, NotificationLink};
pub use status_transition_service::TransitionPolicy;
