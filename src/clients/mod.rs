//! Clients - HTTP Clients
//!
//! Este módulo contiene el cliente HTTP que usa el tablero para hablar con
//! la API de órdenes.

pub mod orders_client;

pub use orders_client::{ClientError, OrdersApi, OrdersClient};
