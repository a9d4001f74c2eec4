use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{Product, ProductPage, ProductQuery, User};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    OrderDetailItem, OrderDetails, OrderHeader, OrderLineItem, OrderStatus, ProductSnapshot,
};
use crate::domain::ports::{OrderSession, OrderStore, StorefrontQueries};
use crate::schema::{order_items, orders, products, users};

use super::models::{NewOrderItemRow, NewOrderRow, OrderRow, ProductRow, UserRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselStore {
    pool: DbPool,
    statement_timeout_ms: Option<u64>,
}

impl DieselStore {
    pub fn new(pool: DbPool, statement_timeout_ms: Option<u64>) -> Self {
        Self {
            pool,
            statement_timeout_ms,
        }
    }
}

impl OrderStore for DieselStore {
    fn in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn OrderSession) -> Result<T, DomainError>,
    {
        let mut conn = self.pool.get()?;
        let statement_timeout_ms = self.statement_timeout_ms;

        // READ COMMITTED plus the FOR UPDATE row locks taken by the session is
        // enough to serialize concurrent check-and-decrement on one product.
        // If `work` panics the connection is left mid-transaction, r2d2 drops
        // it as broken and the server rolls back when the session closes.
        conn.build_transaction().read_committed().run(|conn| {
            if let Some(ms) = statement_timeout_ms {
                diesel::sql_query(format!("SET LOCAL statement_timeout = {ms}")).execute(conn)?;
            }
            work(&mut PgOrderSession { conn })
        })
    }
}

struct PgOrderSession<'a> {
    conn: &'a mut PgConnection,
}

impl OrderSession for PgOrderSession<'_> {
    fn read_product_for_update(
        &mut self,
        product_id: i32,
    ) -> Result<Option<ProductSnapshot>, DomainError> {
        let row = products::table
            .find(product_id)
            .select((products::price, products::stock_quantity))
            .for_update()
            .get_result::<(BigDecimal, i32)>(self.conn)
            .optional()?;

        Ok(row.map(|(price, stock_quantity)| ProductSnapshot {
            price,
            stock_quantity,
        }))
    }

    fn decrement_stock(&mut self, product_id: i32, amount: i32) -> Result<(), DomainError> {
        let updated = diesel::update(products::table.find(product_id))
            .set((
                products::stock_quantity.eq(products::stock_quantity - amount),
                products::updated_at.eq(Utc::now()),
            ))
            .execute(self.conn)?;

        if updated == 0 {
            return Err(DomainError::ProductNotFound(product_id));
        }
        Ok(())
    }

    fn insert_order(
        &mut self,
        buyer_id: i32,
        total_amount: &BigDecimal,
        status: OrderStatus,
    ) -> Result<OrderHeader, DomainError> {
        let (id, created_at) = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                user_id: buyer_id,
                total_amount,
                status: status.as_str(),
            })
            .returning((orders::id, orders::created_at))
            .get_result::<(i32, DateTime<Utc>)>(self.conn)?;

        Ok(OrderHeader { id, created_at })
    }

    fn insert_order_line_item(
        &mut self,
        order_id: i32,
        item: &OrderLineItem,
    ) -> Result<(), DomainError> {
        diesel::insert_into(order_items::table)
            .values(&NewOrderItemRow {
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                price_at_purchase: &item.price_at_purchase,
            })
            .execute(self.conn)?;
        Ok(())
    }
}

impl StorefrontQueries for DieselStore {
    fn find_user(&self, id: i32) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let user = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user.map(User::from))
    }

    fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = products::table.into_boxed();
            let mut page_query = products::table.into_boxed();
            if let Some(category) = query.category.as_deref() {
                count_query = count_query.filter(products::category.eq(category));
                page_query = page_query.filter(products::category.eq(category));
            }

            let total: i64 = count_query.count().get_result(conn)?;

            let rows = page_query
                .select(ProductRow::as_select())
                .order((products::created_at.desc(), products::id.desc()))
                .limit(query.limit)
                .offset(query.offset())
                .load(conn)?;

            Ok(ProductPage {
                items: rows.into_iter().map(Product::from).collect(),
                total,
            })
        })
    }

    fn find_order_details(&self, id: i32) -> Result<Option<OrderDetails>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let header = orders::table
                .inner_join(users::table)
                .filter(orders::id.eq(id))
                .select((OrderRow::as_select(), UserRow::as_select()))
                .first::<(OrderRow, UserRow)>(conn)
                .optional()?;

            let Some((order, user)) = header else {
                return Ok(None);
            };

            let items = order_items::table
                .inner_join(products::table)
                .filter(order_items::order_id.eq(order.id))
                .order(order_items::id.asc())
                .select((
                    order_items::product_id,
                    products::name,
                    order_items::quantity,
                    order_items::price_at_purchase,
                ))
                .load::<(i32, String, i32, BigDecimal)>(conn)?;

            Ok(Some(OrderDetails {
                order_id: order.id,
                total_amount: order.total_amount,
                status: order.status.parse()?,
                order_date: order.created_at,
                username: user.username,
                email: user.email,
                items: items
                    .into_iter()
                    .map(|(product_id, product_name, quantity, price)| OrderDetailItem {
                        product_id,
                        product_name,
                        quantity,
                        price,
                    })
                    .collect(),
            }))
        })
    }
}
