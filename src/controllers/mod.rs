pub mod service_order_controller;
