use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{NewCustomer, NewLineItem, NewServiceOrder, NewVehicle, OrderStatus, StatusEvent};
use crate::utils::validation::{normalize_plate, validate_phone, validate_price, PLATE_REGEX};

// Request para crear una orden de servicio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceOrderRequest {
    #[validate]
    pub customer: CustomerInput,

    #[validate]
    pub vehicle: VehicleInput,

    #[validate(length(min = 1), custom = "validate_items")]
    pub items: Vec<LineItemInput>,

    pub expected_exit_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(custom = "validate_phone")]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleInput {
    #[validate(regex = "PLATE_REGEX")]
    pub plate: String,

    #[validate(length(min = 1, max = 60))]
    pub model: String,

    #[validate(length(max = 30))]
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineItemInput {
    pub service_name: String,
    pub price: Decimal,
}

fn validate_items(items: &[LineItemInput]) -> Result<(), ValidationError> {
    for item in items {
        let name_len = item.service_name.trim().chars().count();
        if !(2..=100).contains(&name_len) {
            let mut error = ValidationError::new("service_name");
            error.add_param("value".into(), &item.service_name);
            return Err(error);
        }
        validate_price(&item.price)?;
    }
    Ok(())
}

impl From<CreateServiceOrderRequest> for NewServiceOrder {
    fn from(request: CreateServiceOrderRequest) -> Self {
        Self {
            customer: NewCustomer {
                name: request.customer.name.trim().to_string(),
                phone: request.customer.phone.trim().to_string(),
            },
            vehicle: NewVehicle {
                plate: normalize_plate(&request.vehicle.plate),
                model: request.vehicle.model.trim().to_string(),
                color: request
                    .vehicle
                    .color
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty()),
            },
            items: request
                .items
                .into_iter()
                .map(|item| NewLineItem {
                    service_name: item.service_name.trim().to_string(),
                    price: item.price,
                })
                .collect(),
            expected_exit_at: request.expected_exit_at,
        }
    }
}

// Request del endpoint de transición: { status, version? }
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

// Historial de transiciones de una orden
#[derive(Debug, Serialize)]
pub struct StatusHistoryResponse {
    pub order_id: Uuid,
    pub events: Vec<StatusEvent>,
}

// Estados destino permitidos, para que el cliente pinte solo columnas válidas
#[derive(Debug, Serialize)]
pub struct AllowedTransitionsResponse {
    pub policy: &'static str,
    pub from: OrderStatus,
    pub targets: Vec<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateServiceOrderRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let req = request(json!({
            "customer": { "name": "Pedro Alves", "phone": "(21) 99876-5432" },
            "vehicle": { "plate": "abc-1d23", "model": "Corolla", "color": "Preto" },
            "items": [
                { "service_name": "Lavagem completa", "price": 45.0 },
                { "service_name": "Cera", "price": 20.5 }
            ]
        }));
        assert!(req.validate().is_ok());

        let new_order = NewServiceOrder::from(req);
        assert_eq!(new_order.vehicle.plate, "ABC1D23");
        assert_eq!(new_order.total(), Decimal::new(6550, 2));
    }

    #[test]
    fn test_invalid_requests() {
        let bad_plate = request(json!({
            "customer": { "name": "Pedro", "phone": "21998765432" },
            "vehicle": { "plate": "12345", "model": "Corolla" },
            "items": [{ "service_name": "Lavagem", "price": 30 }]
        }));
        assert!(bad_plate.validate().is_err());

        let no_items = request(json!({
            "customer": { "name": "Pedro", "phone": "21998765432" },
            "vehicle": { "plate": "ABC1234", "model": "Corolla" },
            "items": []
        }));
        let errors = no_items.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));

        let negative_price = request(json!({
            "customer": { "name": "Pedro", "phone": "21998765432" },
            "vehicle": { "plate": "ABC1234", "model": "Corolla" },
            "items": [{ "service_name": "Lavagem", "price": -1 }]
        }));
        assert!(negative_price.validate().is_err());

        let bad_phone = request(json!({
            "customer": { "name": "Pedro", "phone": "1234" },
            "vehicle": { "plate": "ABC1234", "model": "Corolla" },
            "items": [{ "service_name": "Lavagem", "price": 30 }]
        }));
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_status_request_version_is_optional() {
        let req: UpdateStatusRequest = serde_json::from_value(json!({ "status": "WASHING" })).unwrap();
        assert_eq!(req.status, "WASHING");
        assert_eq!(req.version, None);
    }
}
