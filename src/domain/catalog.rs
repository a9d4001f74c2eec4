use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing parameters after normalization: `page >= 1`, `1 <= limit <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: i64,
    pub limit: i64,
    pub category: Option<String>,
}

impl ProductQuery {
    pub fn new(page: Option<i64>, limit: Option<i64>, category: Option<String>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let category = category.filter(|c| !c.is_empty());
        Self {
            page,
            limit,
            category,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
}
