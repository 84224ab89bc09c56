use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::AppConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured
/// default level; production logs are emitted as JSON lines.
pub fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let builder = fmt().with_env_filter(filter).with_target(true);

    let installed = if config.is_production() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
