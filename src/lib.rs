use std::sync::Arc;

use actix_web::http::Method;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod api_errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;
pub mod templates;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{limiter, mail, utils};

use config::ConfigError;
use limiter::rate_limiter::RateLimiterStore;
use mail::smtp::{Notifier, SmtpNotifier};
use repositories::submission::{FileSubmissionStore, SubmissionStore};
use use_cases::contact::ContactHandler;

pub struct AppState {
    pub config: settings::AppConfig,
    pub contact_handler: ContactHandler,
    pub limits: RateLimits,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Result<Self, ConfigError> {
        let store = FileSubmissionStore::new(&config.submissions_dir);
        let notifier = SmtpNotifier::new(config.mail());

        Self::with_components(config, Arc::new(store), Arc::new(notifier))
    }

    pub fn with_components(
        config: &settings::AppConfig,
        store: Arc<dyn SubmissionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        let limits = RateLimits {
            default: RateLimiterStore::new(config.default_limits()?),
            contact: RateLimiterStore::new(config.contact_limits()?),
        };

        Ok(AppState {
            config: config.clone(),
            contact_handler: ContactHandler::new(store, notifier),
            limits,
        })
    }
}

/// Limiters applied at the HTTP boundary, keyed by client address.
#[derive(Clone)]
pub struct RateLimits {
    pub default: RateLimiterStore,
    pub contact: RateLimiterStore,
}

impl RateLimits {
    /// The health check and static assets are never limited; the contact
    /// route only counts against its own limit.
    pub fn for_route(&self, method: &Method, path: &str) -> Option<&RateLimiterStore> {
        let read = *method == Method::GET || *method == Method::HEAD;
        if path == "/api/health" || (read && handlers::assets::is_asset_path(path)) {
            None
        } else if *method == Method::POST && path == "/api/contact" {
            Some(&self.contact)
        } else {
            Some(&self.default)
        }
    }

    pub fn all(&self) -> [&RateLimiterStore; 2] {
        [&self.default, &self.contact]
    }
}
