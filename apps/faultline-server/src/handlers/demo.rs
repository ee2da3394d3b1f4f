//! Demo shop endpoints. Each failure mode maps to one branch of the alert
//! filter: runtime failures, client errors, upstream outages.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::middleware::error::{AppError, AppResult};

#[derive(Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price_cents: u32,
}

const CATALOG: &[Product] = &[
    Product {
        id: 1,
        name: "Espresso beans",
        price_cents: 1490,
    },
    Product {
        id: 2,
        name: "Grinder",
        price_cents: 8900,
    },
];

/// GET /api/products/{id}
pub async fn product(path: web::Path<String>) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let id: u32 = raw
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid product id {raw:?}")))?;

    let product = CATALOG
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::not_found(format!("No product with id {id}")))?;

    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/checkout - the payment gateway is always down in the demo.
pub async fn checkout() -> AppResult<HttpResponse> {
    Err(AppError::runtime("Payment gateway unreachable"))
}

/// GET /api/inventory
pub async fn inventory() -> AppResult<HttpResponse> {
    Err(AppError::service_unavailable("Inventory service is not responding"))
}

/// GET /api/admin
pub async fn admin() -> AppResult<HttpResponse> {
    Err(AppError::forbidden())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_product_lookup() {
        let app = test::init_service(App::new().configure(crate::handlers::configure_shop_routes)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/products/2").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["name"], "Grinder");

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/products/42").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/products/abc").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_failure_modes() {
        let app = test::init_service(App::new().configure(crate::handlers::configure_shop_routes)).await;

        let res = test::call_service(&app, test::TestRequest::post().uri("/api/checkout").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "Internal Server Error");
        assert!(body.get("detail").is_none());

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/inventory").to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/admin").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
