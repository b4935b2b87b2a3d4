mod api;
mod config;
mod database;
mod middleware;
mod models;
mod storage;
mod utils;

use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StorageMode};
use crate::storage::{JsonFileStore, MongoUserStore, UserStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting Users Service...");
    log::info!("🗂️  Running in {:?} storage mode", config.storage_mode);

    let store = open_store(&config).await?;
    let store_data: web::Data<dyn UserStore> = web::Data::from(store);

    let rustls_config = match &config.tls {
        Some(tls) => Some(utils::tls::load_rustls_config(tls).map_err(|e| {
            log::error!("❌ Failed to load TLS certificate/key: {}", e);
            e
        })?),
        None => None,
    };

    let address = config.bind_address();
    let scheme = if rustls_config.is_some() { "https" } else { "http" };
    log::info!("🌐 Server starting on {}://{}", scheme, address);
    log::info!("📚 Swagger UI available at: {}://{}/swagger-ui/", scheme, address);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    });

    let server = match rustls_config {
        Some(tls) => server.bind_rustls_0_23(&address, tls)?,
        None => server.bind(&address)?,
    };

    server.run().await
}

/// Builds the backend selected by `STORAGE_MODE`. A MongoDB that cannot be
/// reached is fatal.
async fn open_store(config: &Config) -> io::Result<Arc<dyn UserStore>> {
    match config.storage_mode {
        StorageMode::Json => {
            let store = JsonFileStore::open(config.users_file.clone()).await;
            log::info!("📁 Using JSON storage ({})", store.path().display());
            Ok(Arc::new(store))
        }
        StorageMode::Mongo => {
            let db = database::MongoDB::connect(&config.mongo_uri, &config.mongo_db_name)
                .await
                .map_err(|e| {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    io::Error::new(io::ErrorKind::ConnectionRefused, e)
                })?;

            log::info!("📊 Using MongoDB storage (database: {})", db.database().name());
            Ok(Arc::new(MongoUserStore::new(&db)))
        }
    }
}
