pub mod cancellation;
pub mod catalog_service;
pub mod order_service;
