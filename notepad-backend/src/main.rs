use actix_cors::Cors;
use actix_web::{middleware::DefaultHeaders, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod notes;

use config::Config;
use notes::NoteStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<NoteStore>,
    /// Server start time for uptime calculation
    pub started_at: std::time::Instant,
}

/// Every response is marked uncacheable so browsers always see current content
pub fn no_cache_headers() -> DefaultHeaders {
    DefaultHeaders::new().add(("Cache-Control", "no-store"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notepad v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let port = config.port;
    let bind_address = config.bind_address.clone();

    log::info!("Initializing note store at {}", config.notes_dir.display());
    let store = NoteStore::open(&config.notes_dir).map_err(|e| {
        log::error!("Failed to open notes directory {}: {}", config.notes_dir.display(), e);
        std::io::Error::other(e.to_string())
    })?;
    let store = Arc::new(store);

    match &config.public_url {
        Some(url) => log::info!("Public URL: {}", url),
        None => log::info!("Public URL: derived from request Host header"),
    }
    if !config.cli_raw_shim {
        log::info!("curl/Wget raw-read shim disabled");
    }

    let started_at = std::time::Instant::now();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                store: Arc::clone(&store),
                started_at,
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(no_cache_headers())
            .configure(controllers::health::config_routes)
            // Note routes end in a catch-all, so they must come last
            .configure(controllers::notes::config)
    })
    .bind((bind_address.as_str(), port))?
    .run();

    log::info!("Listening on http://{}:{}", bind_address, port);

    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
