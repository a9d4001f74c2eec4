use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::StorageUnavailable(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub buyer_id: i32,
    pub lines: Vec<OrderLineRequest>,
}

impl PlaceOrderRequest {
    /// Checks the request shape. Runs before any storage access.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.buyer_id <= 0 {
            return Err(DomainError::InvalidRequest(format!(
                "invalid buyer id {}",
                self.buyer_id
            )));
        }
        if self.lines.is_empty() {
            return Err(DomainError::InvalidRequest(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity <= 0) {
            return Err(DomainError::InvalidRequest(format!(
                "quantity for product {} must be positive",
                line.product_id
            )));
        }
        Ok(())
    }
}

/// Price and stock of a product as observed under the row lock.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub price: BigDecimal,
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    pub product_id: i32,
    pub quantity: i32,
    pub price_at_purchase: BigDecimal,
}

/// Store-assigned fields of a freshly inserted order row.
#[derive(Debug, Clone)]
pub struct OrderHeader {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: i32,
    pub buyer_id: i32,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLineItem>,
}

#[derive(Debug, Clone)]
pub struct OrderDetailItem {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order_id: i32,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub items: Vec<OrderDetailItem>,
}

/// Fixed two-decimal text form used for every amount leaving the service.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.with_scale(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = PlaceOrderRequest {
            buyer_id: 1,
            lines: vec![line(1, 2), line(2, 1)],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn zero_buyer_is_invalid() {
        let req = PlaceOrderRequest {
            buyer_id: 0,
            lines: vec![line(1, 1)],
        };
        assert!(matches!(req.validate(), Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn empty_lines_are_invalid() {
        let req = PlaceOrderRequest {
            buyer_id: 7,
            lines: vec![],
        };
        assert!(matches!(req.validate(), Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn non_positive_quantity_is_invalid() {
        for quantity in [0, -3] {
            let req = PlaceOrderRequest {
                buyer_id: 7,
                lines: vec![line(1, 1), line(2, quantity)],
            };
            let err = req.validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid request: quantity for product 2 must be positive"
            );
        }
    }

    #[test]
    fn status_parses_its_own_text_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn amounts_are_rendered_with_two_decimals() {
        assert_eq!(format_amount(&BigDecimal::from(30)), "30.00");
        assert_eq!(format_amount(&"9.5".parse::<BigDecimal>().unwrap()), "9.50");
        assert_eq!(format_amount(&"19.99".parse::<BigDecimal>().unwrap()), "19.99");
    }
}
