use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Product {0} not found")]
    ProductNotFound(i32),
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i32),
    #[error("User {0} not found")]
    UserNotFound(i32),
    #[error("Order {0} not found")]
    OrderNotFound(i32),
    #[error("Request cancelled before commit")]
    Cancelled,
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}
