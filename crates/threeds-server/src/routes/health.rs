use actix_web::{get, web, HttpRequest, HttpResponse};

use threeds::security::constant_time_eq;

use crate::metrics::{self, TRACKED_TRANSACTIONS};
use crate::state::AppState;

/// GET /health - liveness plus the number of in-flight transactions
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let tracked = state.flow.store().len();
    TRACKED_TRANSACTIONS.set(tracked as i64);

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "threeds-server",
        "version": env!("CARGO_PKG_VERSION"),
        "trackedTransactions": tracked,
    }))
}

/// GET /metrics - Prometheus metrics endpoint (optionally auth-gated)
#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    // Check bearer token if METRICS_TOKEN is configured
    if let Some(ref expected_token) = state.metrics_token {
        let authorized = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| constant_time_eq(token.as_bytes(), expected_token.as_bytes()))
            .unwrap_or(false);

        if !authorized {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "unauthorized",
                "message": "Valid Bearer token required for /metrics"
            }));
        }
    }

    TRACKED_TRANSACTIONS.set(state.flow.store().len() as i64);

    match metrics::metrics_output() {
        Ok(output) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(output),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().body("Failed to encode metrics")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(metrics_endpoint);
}
