mod config;
mod db;
mod ingest;
mod services;
mod state;
mod tenant;
#[cfg(test)]
mod test_support;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = SqliteStore::open(&config.database_path).map_err(io::Error::other)?;
    info!(
        "Using database {} (duplicate names: {:?})",
        config.database_path.display(),
        config.duplicate_names
    );

    let state = AppState {
        store,
        duplicate_names: config.duplicate_names,
    };

    info!("Server running at {}", config.bind_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
