use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub checked_at: String,
}

/// `GET /health`: 200 when storage answers a query, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let reachable = match state.repos.categories.list_all().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(storage = state.storage, "Health check failed: {}", e);
            false
        }
    };

    let report = HealthReport {
        status: if reachable { "ok" } else { "unavailable" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
        checked_at: chrono::Utc::now().to_rfc3339(),
    };

    if reachable {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
