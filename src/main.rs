use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer};
use actix_web::middleware::Logger;
use actix_web::http::header;
use anyhow::Context;
use env_logger::Env;
use medialocker::Services;
use medialocker::blob::LocalBlobStore;
use medialocker::config::Config;
use medialocker::db::Db;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::from_env_config("config.toml")?;

    let db = Db::connect_with_retry(
        &cfg.database_path,
        cfg.db_connect_attempts,
        cfg.db_connect_backoff(),
    )
    .await
    .context("database init failed")?;
    let blobs = LocalBlobStore::new(&cfg.media_dir)
        .await
        .with_context(|| format!("blob directory {} unusable", cfg.media_dir))?;

    let listen_addr = cfg.listen.clone();
    let services = Services::new(cfg, db, Arc::new(blobs))?;
    log::info!("Starting server at {}", listen_addr);

    HttpServer::new(move || {
        let cors = Cors::permissive()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .configure(|c| services.configure(c))
    })
    .bind(listen_addr)?
    .run()
    .await?;
    Ok(())
}
