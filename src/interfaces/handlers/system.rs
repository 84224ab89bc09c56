use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::uptime, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

#[derive(Serialize)]
struct PublicConfigResponse {
    contact_enabled: bool,
    rate_limit_contact: String,
    debug: bool,
}

#[derive(Serialize)]
struct StatsResponse {
    total_visits: u64,
    contact_submissions: u64,
    uptime: String,
    last_updated: String,
}

/// Liveness check. Does not depend on mail configuration.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[get("/config")]
pub async fn public_config(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(PublicConfigResponse {
        contact_enabled: state.config.contact_enabled(),
        rate_limit_contact: state.config.ratelimit_contact.clone(),
        debug: state.config.debug,
    })
}

/// Usage counters are not tracked; they stay at zero.
#[get("/stats")]
pub async fn stats() -> impl Responder {
    HttpResponse::Ok().json(StatsResponse {
        total_visits: 0,
        contact_submissions: 0,
        uptime: format_duration(uptime()).to_string(),
        last_updated: Utc::now().to_rfc3339(),
    })
}
