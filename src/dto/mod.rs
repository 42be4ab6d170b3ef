pub mod api_response;
pub mod service_order_dto;

pub use api_response::ApiResponse;
