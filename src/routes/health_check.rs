//! src/routes/health_check.rs
use actix_web::HttpResponse;

/// Liveness only. The database is not touched.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
