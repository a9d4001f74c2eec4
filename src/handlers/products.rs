use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::catalog_service::CatalogService;
use crate::domain::catalog::{Product, ProductQuery};
use crate::domain::order::format_amount;
use crate::errors::AppError;
use crate::infrastructure::store::DieselStore;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<i64>,
    /// Items per page. Defaults to 10, maximum 100.
    pub limit: Option<i64>,
    /// Only return products in this category.
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock_quantity: i32,
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: format_amount(&p.price),
            stock_quantity: p.stock_quantity,
            category: p.category,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub products: Vec<ProductResponse>,
    pub pagination: Pagination,
}

/// GET /products
///
/// Newest products first, optionally narrowed to one category.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated list of products", body = ListProductsResponse),
        (status = 500, description = "Database error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<CatalogService<DieselStore>>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let query = ProductQuery::new(params.page, params.limit, params.category);
    let (page, limit) = (query.page, query.limit);

    let result = web::block(move || service.list_products(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        products: result.items.into_iter().map(ProductResponse::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total: result.total,
        },
    }))
}
