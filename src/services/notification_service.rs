//! Aviso al cliente por WhatsApp
//!
//! Construye el enlace `wa.me` con el mensaje de vehículo listo. No envía
//! nada: el usuario abre el enlace y confirma el envío en la app.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{OrderStatus, ServiceOrder};
use crate::utils::validation::digits_only;

const WHATSAPP_BASE_URL: &str = "https://wa.me/55";

#[derive(Debug, Error, PartialEq)]
pub enum NotificationError {
    #[error("La orden #{code} está en {status}, solo se avisa cuando está READY")]
    NotReady { code: i64, status: OrderStatus },

    #[error("Teléfono del cliente sin dígitos: '{0}'")]
    InvalidPhone(String),

    #[error("La orden {0} no está en el tablero")]
    UnknownOrder(Uuid),
}

/// Enlace listo para abrir en una nueva pestaña
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLink {
    pub order_id: Uuid,
    pub message: String,
    pub url: String,
}

/// Texto del aviso con el primer nombre del cliente y la placa
pub fn ready_message(first_name: &str, plate: &str) -> String {
    format!(
        "Olá {}! Seu veículo de placa {} está pronto para retirada. Obrigado pela preferência!",
        first_name, plate
    )
}

/// Teléfono nacional sin el 55 del país (se agrega en la URL)
fn national_digits(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.strip_prefix("55") {
        Some(rest) if digits.len() > 11 => rest.to_string(),
        _ => digits,
    }
}

/// Construir el enlace de WhatsApp; solo para órdenes en READY
pub fn build_ready_link(order: &ServiceOrder) -> Result<NotificationLink, NotificationError> {
    if order.status != OrderStatus::Ready {
        return Err(NotificationError::NotReady {
            code: order.code,
            status: order.status,
        });
    }

    let phone = national_digits(&order.customer.phone);
    if phone.is_empty() {
        return Err(NotificationError::InvalidPhone(order.customer.phone.clone()));
    }

    let message = ready_message(order.customer.first_name(), &order.vehicle.plate);
    let url = format!(
        "{}{}?text={}",
        WHATSAPP_BASE_URL,
        phone,
        urlencoding::encode(&message)
    );

    Ok(NotificationLink {
        order_id: order.id,
        message,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Vehicle};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order(status: OrderStatus, phone: &str) -> ServiceOrder {
        ServiceOrder {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            code: 7,
            status,
            customer: Customer {
                id: Uuid::new_v4(),
                name: "Fernanda Lima Costa".to_string(),
                phone: phone.to_string(),
            },
            vehicle: Vehicle {
                id: Uuid::new_v4(),
                plate: "BRA2E19".to_string(),
                model: "HB20".to_string(),
                color: None,
            },
            items: Vec::new(),
            total: Decimal::ZERO,
            entry_at: Utc::now(),
            expected_exit_at: None,
            version: 4,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_for_ready_order() {
        let link = build_ready_link(&order(OrderStatus::Ready, "(11) 98765-4321")).unwrap();

        assert!(link.url.starts_with("https://wa.me/5511987654321?text="));
        assert!(link.message.contains("Fernanda"));
        assert!(!link.message.contains("Lima"));
        assert!(link.message.contains("BRA2E19"));

        let encoded = link.url.split("?text=").nth(1).unwrap();
        assert!(!encoded.contains(' '));
        assert_eq!(urlencoding::decode(encoded).unwrap(), link.message);
    }

    #[test]
    fn test_country_code_is_not_duplicated() {
        let link = build_ready_link(&order(OrderStatus::Ready, "+55 11 98765-4321")).unwrap();
        assert!(link.url.starts_with("https://wa.me/5511987654321?"));
    }

    #[test]
    fn test_only_ready_orders() {
        for status in [
            OrderStatus::Awaiting,
            OrderStatus::Washing,
            OrderStatus::Finishing,
            OrderStatus::Delivered,
        ] {
            let err = build_ready_link(&order(status, "11987654321")).unwrap_err();
            assert_eq!(err, NotificationError::NotReady { code: 7, status });
        }
    }

    #[test]
    fn test_phone_without_digits() {
        let err = build_ready_link(&order(OrderStatus::Ready, "sem telefone")).unwrap_err();
        assert!(matches!(err, NotificationError::InvalidPhone(_)));
    }
}
