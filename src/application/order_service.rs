use bigdecimal::{BigDecimal, Zero};

use super::cancellation::CancellationToken;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    OrderDetails, OrderLineItem, OrderStatus, PlaceOrderRequest, PlacedOrder,
};
use crate::domain::ports::{OrderStore, StorefrontQueries};

pub struct OrderService<S> {
    store: S,
}

impl<S> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: OrderStore> OrderService<S> {
    /// Places an order as one all-or-nothing unit of work.
    ///
    /// Lines are processed in the order given. Each product row is read under
    /// a lock, checked against the requested quantity, and decremented before
    /// the next line is looked at, so repeated products see the stock left by
    /// earlier lines. The price read here is the one recorded on the line item.
    pub fn place_order(&self, request: PlaceOrderRequest) -> Result<PlacedOrder, DomainError> {
        self.place_order_until_cancelled(request, &CancellationToken::new())
    }

    /// Same as [`place_order`](Self::place_order), but rolls back instead of
    /// committing once `cancel` has been triggered.
    pub fn place_order_until_cancelled(
        &self,
        request: PlaceOrderRequest,
        cancel: &CancellationToken,
    ) -> Result<PlacedOrder, DomainError> {
        request.validate()?;

        let result = self.store.in_transaction(|session| {
            let mut total_amount = BigDecimal::zero();
            let mut items = Vec::with_capacity(request.lines.len());

            for line in &request.lines {
                if cancel.is_cancelled() {
                    return Err(DomainError::Cancelled);
                }
                let product = session
                    .read_product_for_update(line.product_id)?
                    .ok_or(DomainError::ProductNotFound(line.product_id))?;

                if product.stock_quantity < line.quantity {
                    return Err(DomainError::InsufficientStock(line.product_id));
                }

                total_amount += product.price.clone() * BigDecimal::from(line.quantity);
                session.decrement_stock(line.product_id, line.quantity)?;

                items.push(OrderLineItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price_at_purchase: product.price,
                });
            }

            let header =
                session.insert_order(request.buyer_id, &total_amount, OrderStatus::Pending)?;
            for item in &items {
                session.insert_order_line_item(header.id, item)?;
            }

            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled);
            }

            Ok(PlacedOrder {
                id: header.id,
                buyer_id: request.buyer_id,
                total_amount,
                status: OrderStatus::Pending,
                created_at: header.created_at,
                items,
            })
        });

        match &result {
            Ok(order) => log::info!(
                "Placed order {} for buyer {} ({} items, total {})",
                order.id,
                order.buyer_id,
                order.items.len(),
                order.total_amount
            ),
            Err(e) => log::warn!("Order for buyer {} rejected: {}", request.buyer_id, e),
        }

        result
    }
}

impl<S: StorefrontQueries> OrderService<S> {
    pub fn get_order(&self, id: i32) -> Result<OrderDetails, DomainError> {
        self.store
            .find_order_details(id)?
            .ok_or(DomainError::OrderNotFound(id))
    }
}
