use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::cancellation::CancellationToken;
use crate::application::order_service::OrderService;
use crate::domain::order::{
    format_amount, OrderDetails, OrderLineRequest, PlaceOrderRequest, PlacedOrder,
};
use crate::errors::AppError;
use crate::infrastructure::store::DieselStore;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    #[serde(default)]
    pub items: Vec<CreateOrderItemRequest>,
}

impl From<CreateOrderRequest> for PlaceOrderRequest {
    fn from(body: CreateOrderRequest) -> Self {
        PlaceOrderRequest {
            buyer_id: body.user_id,
            lines: body
                .items
                .into_iter()
                .map(|i| OrderLineRequest {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: i32,
    /// Two-decimal string, e.g. "30.00"
    pub total_amount: String,
    pub status: String,
    pub message: String,
}

impl From<PlacedOrder> for CreateOrderResponse {
    fn from(order: PlacedOrder) -> Self {
        CreateOrderResponse {
            order_id: order.id,
            total_amount: format_amount(&order.total_amount),
            status: order.status.to_string(),
            message: "Order created successfully".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailsResponse {
    pub order_id: i32,
    pub total_amount: String,
    pub status: String,
    pub order_date: String,
    pub username: String,
    pub email: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(order: OrderDetails) -> Self {
        OrderDetailsResponse {
            order_id: order.order_id,
            total_amount: format_amount(&order.total_amount),
            status: order.status.to_string(),
            order_date: order.order_date.to_rfc3339(),
            username: order.username,
            email: order.email,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product_id: i.product_id,
                    product_name: i.product_name,
                    quantity: i.quantity,
                    price: format_amount(&i.price),
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order. Stock checks, stock decrements, the order row and its
/// items are written in a single transaction; on any failure nothing is kept.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Invalid request or insufficient stock"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Database error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService<DieselStore>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = PlaceOrderRequest::from(body.into_inner());

    // Dropping this future (client gone) trips the token; the transaction
    // then rolls back instead of committing.
    let cancel = CancellationToken::new();
    let guard = cancel.drop_guard();

    let order = web::block(move || service.place_order_until_cancelled(request, &cancel))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    guard.disarm();

    Ok(HttpResponse::Created().json(CreateOrderResponse::from(order)))
}

/// GET /orders/{id}
///
/// Returns the order with its buyer and purchased items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderDetailsResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Database error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService<DieselStore>>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderDetailsResponse::from(order)))
}
