pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::get_user,
        products::list_products,
        orders::create_order,
        orders::get_order,
    ),
    tags(
        (name = "orders", description = "Order placement and lookup"),
        (name = "products", description = "Product catalog"),
        (name = "users", description = "User lookup"),
        (name = "system", description = "Service health"),
    )
)]
pub struct ApiDoc;
