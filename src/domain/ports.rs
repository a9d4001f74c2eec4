use bigdecimal::BigDecimal;

use super::catalog::{ProductPage, ProductQuery, User};
use super::errors::DomainError;
use super::order::{OrderDetails, OrderHeader, OrderLineItem, OrderStatus, ProductSnapshot};

/// Operations available inside an open order transaction.
pub trait OrderSession {
    /// Reads price and stock, locking the row until the transaction ends.
    fn read_product_for_update(
        &mut self,
        product_id: i32,
    ) -> Result<Option<ProductSnapshot>, DomainError>;

    fn decrement_stock(&mut self, product_id: i32, amount: i32) -> Result<(), DomainError>;

    fn insert_order(
        &mut self,
        buyer_id: i32,
        total_amount: &BigDecimal,
        status: OrderStatus,
    ) -> Result<OrderHeader, DomainError>;

    fn insert_order_line_item(
        &mut self,
        order_id: i32,
        item: &OrderLineItem,
    ) -> Result<(), DomainError>;
}

/// A transactional backend for order placement.
///
/// `in_transaction` opens a transaction, hands a session to `work`, and
/// commits when `work` returns `Ok`. Any `Err` (from `work` or from the commit
/// itself) leaves nothing behind.
pub trait OrderStore: Send + Sync + 'static {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn OrderSession) -> Result<T, DomainError>;
}

pub trait StorefrontQueries: Send + Sync + 'static {
    fn find_user(&self, id: i32) -> Result<Option<User>, DomainError>;
    fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, DomainError>;
    fn find_order_details(&self, id: i32) -> Result<Option<OrderDetails>, DomainError>;
}
