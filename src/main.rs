use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use once_cell::sync::Lazy;
use portfolio_site::{
    background_task::start_limiter_eviction_task,
    constants::START_TIME,
    graceful_shutdown::shutdown_signal,
    handlers::home::not_found,
    middlewares::rate_limit::RateLimitMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new()?;
    init_tracing(&config)?;

    match config.check() {
        Ok(problems) => {
            for problem in problems {
                tracing::warn!("Configuration warning: {}", problem);
            }
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Lazy::force(&START_TIME);

    let app_state = web::Data::new(AppState::new(&config)?);
    tokio::spawn(start_limiter_eviction_task(app_state.limits.clone()));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        env = ?config.env,
        debug = config.debug,
        contact_enabled = config.contact_enabled(),
        "Starting {} v{} on {}",
        config.site_name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(RateLimitMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
            .default_service(web::to(not_found))
    })
    .workers(config.worker_count)
    .bind((config.host.as_str(), config.port))?
    .run();

    tokio::select! {
        res = server => res?,
        _ = shutdown_signal() => tracing::info!("Server stopped"),
    }

    Ok(())
}
