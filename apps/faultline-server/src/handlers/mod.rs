//! HTTP handlers and route configuration.

mod demo;
mod health;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check));
    configure_shop_routes(cfg);
}

/// Demo shop routes whose failures exercise the alerting pipeline.
pub fn configure_shop_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/products/{id}", web::get().to(demo::product))
            .route("/checkout", web::post().to(demo::checkout))
            .route("/inventory", web::get().to(demo::inventory))
            .route("/admin", web::get().to(demo::admin)),
    );
}
