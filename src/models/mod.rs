//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL
//! de las órdenes de servicio y los tipos de autenticación.

pub mod auth;
pub mod service_order;

pub use service_order::{
    Customer, LineItem, NewCustomer, NewLineItem, NewServiceOrder, NewVehicle, OrderStatus,
    ServiceOrder, StatusChange, StatusEvent, StatusWrite, Vehicle,
};
