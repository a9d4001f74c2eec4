pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use errors::AppError;
use handlers::ApiDoc;
use infrastructure::store::DieselStore;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for migration in applied {
        log::info!("Applied migration {}", migration);
    }
    Ok(())
}

/// Path extractor config that answers a non-integer id with a 400 naming the resource.
fn rejected_id(message: &'static str) -> web::PathConfig {
    web::PathConfig::default().error_handler(move |err, _req| {
        log::debug!("Rejected path parameter: {}", err);
        error::Error::from(AppError::BadRequest(message.to_string()))
    })
}

/// Build and return an actix-web `Server` bound to `config.host:config.port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &AppConfig) -> std::io::Result<actix_web::dev::Server> {
    let store = DieselStore::new(pool, config.statement_timeout_ms);
    let order_service = web::Data::new(OrderService::new(store.clone()));
    let catalog_service = web::Data::new(CatalogService::new(store));
    let app_config = web::Data::new(config.clone());
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(order_service.clone())
            .app_data(catalog_service.clone())
            .app_data(app_config.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                log::debug!("Rejected request body: {}", err);
                error::Error::from(AppError::BadRequest("Invalid JSON".to_string()))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                log::debug!("Rejected query string: {}", err);
                error::Error::from(AppError::BadRequest("Invalid query parameters".to_string()))
            }))
            .wrap(Logger::default())
            .route("/health", web::get().to(handlers::health::health))
            .service(
                web::resource("/users/{id}")
                    .app_data(rejected_id("Invalid user ID"))
                    .route(web::get().to(handlers::users::get_user)),
            )
            .route("/products", web::get().to(handlers::products::list_products))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .service(
                        web::resource("/{id}")
                            .app_data(rejected_id("Invalid order ID"))
                            .route(web::get().to(handlers::orders::get_order)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
