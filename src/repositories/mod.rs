pub mod memory_order_store;
pub mod order_store;
pub mod service_order_repository;

pub use memory_order_store::MemoryOrderStore;
pub use order_store::OrderStore;
pub use service_order_repository::ServiceOrderRepository;
