pub mod api_doc;
pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, middleware::Logger, web, App, HttpRequest, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::application::order_service::OrderService;
use crate::config::Settings;
use crate::domain::assembler::OrderAssembler;
use crate::domain::errors::DomainError;
use crate::domain::order_number::RandomOrderNumbers;
use crate::errors::AppError;
use crate::infrastructure::catalog_repo::DieselCatalogStore;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::user_repo::DieselUserStore;

pub use db::{create_pool, run_migrations, DbPool, MIGRATIONS};

/// Wires the order service to the PostgreSQL-backed stores.
pub fn build_service(pool: DbPool, settings: &Settings) -> Result<OrderService, DomainError> {
    let assembler = OrderAssembler::new(settings.shipping_fee.clone())?;
    Ok(OrderService::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselCatalogStore::new(pool.clone())),
        Arc::new(DieselUserStore::new(pool)),
        Arc::new(RandomOrderNumbers::new(settings.order_number_prefix.clone())),
        assembler,
    )
    .with_max_number_attempts(settings.order_number_max_attempts))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation {
        field: None,
        message: format!("Invalid request body: {err}"),
    }
    .into()
}

/// Routes and extractor config, shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{health, orders};

    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(health::health))
        .route(
            "/payments/initiate",
            web::post().to(orders::initiate_payment),
        )
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::create_order))
                .route("/my", web::get().to(orders::my_orders))
                .route("/admin/all", web::get().to(orders::admin_orders))
                .route(
                    "/admin/{id}/status",
                    web::patch().to(orders::update_status),
                )
                .route("/{id}", web::get().to(orders::get_order)),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: web::Data<OrderService>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
