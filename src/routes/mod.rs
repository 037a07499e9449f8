pub mod auth;
pub mod files;
pub mod health;
pub mod media;

use crate::auth::require_bearer;
use actix_web::middleware::from_fn;
use actix_web::web;

/// Public: register, login, health, blob URLs. Everything under `/media`
/// passes the bearer gate first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/health", web::get().to(health::health_check))
        .route("/files/{name}", web::get().to(files::get_file))
        .service(
            web::scope("/media")
                .wrap(from_fn(require_bearer))
                .route("", web::post().to(media::upload_media))
                .route("", web::get().to(media::list_media))
                .route("/{id}", web::get().to(media::get_media))
                .route("/{id}", web::delete().to(media::delete_media)),
        );
}
