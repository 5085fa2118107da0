use std::io;

use actix_web::web;
use dotenvy::dotenv;
use storefront_orders::config::Settings;
use storefront_orders::{build_server, build_service, create_pool, run_migrations};

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = create_pool(&settings.database_url, settings.db_pool_size)
        .map_err(|e| startup_error("Database pool", e))?;
    run_migrations(&pool).map_err(|e| startup_error("Database migrations", e))?;

    let service = build_service(pool, &settings).map_err(|e| startup_error("Order service", e))?;

    log::info!(
        "Starting server at http://{}:{}",
        settings.host,
        settings.port
    );

    build_server(web::Data::new(service), &settings.host, settings.port)?.await
}
