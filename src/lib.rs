//! Lava-jato: pipeline de estados de órdenes de servicio
//!
//! API HTTP (axum + sqlx) para mover órdenes por
//! AWAITING → WASHING → FINISHING → READY → DELIVERED, y la lógica del
//! tablero del lado cliente que consume esa API.

pub mod board;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
