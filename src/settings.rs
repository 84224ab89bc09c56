use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr};
use zeroize::Zeroizing;

use crate::limiter::rate_limiter::{parse_rules, RateLimitRule};

const PLACEHOLDER_SECRET: &str = "your-secret-key-here";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl AppEnvironment {
    /// Reads `APP_ENV`, then `FLASK_ENV`, defaulting to development.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_env = env::var("APP_ENV")
            .or_else(|_| env::var("FLASK_ENV"))
            .unwrap_or_else(|_| "development".into());
        AppEnvironment::from_str(&raw_env)
    }

    fn presets(self, builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mail_identity = match self {
            AppEnvironment::Development => Some(("dev-secret-key", "dev@example.com", "dev")),
            AppEnvironment::Testing => Some(("test-secret-key", "test@example.com", "test")),
            AppEnvironment::Production => None,
        };

        let builder = builder.set_default("debug", self == AppEnvironment::Development)?;

        match mail_identity {
            Some((secret, address, password)) => builder
                .set_default("secret_key", secret)?
                .set_default("mail_server", "localhost")?
                .set_default("mail_port", 1025)?
                .set_default("mail_use_tls", false)?
                .set_default("mail_username", address)?
                .set_default("mail_password", password)?
                .set_default("mail_default_recipient", address),
            None => Ok(builder),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_site_owner")]
    pub site_owner: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub secret_key: String,

    #[serde(default)]
    pub mail_server: String,

    #[serde(default = "default_mail_port")]
    pub mail_port: u16,

    #[serde(default = "default_mail_use_tls")]
    pub mail_use_tls: bool,

    #[serde(default)]
    pub mail_username: String,

    #[serde(default)]
    pub mail_password: String,

    #[serde(default)]
    pub mail_default_recipient: String,

    #[serde(default = "default_ratelimit_default")]
    pub ratelimit_default: String,

    #[serde(default = "default_ratelimit_contact")]
    pub ratelimit_contact: String,

    #[serde(default = "default_submissions_dir")]
    pub submissions_dir: PathBuf,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_site_name() -> String {
    "Portfolio".to_string()
}
fn default_site_owner() -> String {
    "Portfolio Owner".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_mail_port() -> u16 {
    587
}
fn default_mail_use_tls() -> bool {
    true
}
fn default_ratelimit_default() -> String {
    "200 per day, 50 per hour".to_string()
}
fn default_ratelimit_contact() -> String {
    "5 per hour".to_string()
}
fn default_submissions_dir() -> PathBuf {
    PathBuf::from("submissions")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl AppConfig {
    /// Loads `.env`, optional `config/` files and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::load(AppEnvironment::from_env()?, None)
    }

    /// `vars` replaces the process environment when given.
    pub fn load(env_name: AppEnvironment, vars: Option<config::Map<String, String>>) -> Result<Self, ConfigError> {
        let builder = env_name
            .presets(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::default().ignore_empty(true).source(vars));

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.env = env_name;

        config.default_limits()?;
        config.contact_limits()?;

        Ok(config)
    }

    /// Lists missing or unsafe settings.
    pub fn problems(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();

        if self.secret_key.trim().is_empty() {
            errors.push("SECRET_KEY is required");
        }
        if self.mail_server.trim().is_empty() {
            errors.push("MAIL_SERVER is required");
        }
        if self.mail_username.trim().is_empty() {
            errors.push("MAIL_USERNAME is required");
        }
        if self.mail_password.is_empty() {
            errors.push("MAIL_PASSWORD is required");
        }
        if self.mail_default_recipient.trim().is_empty() {
            errors.push("MAIL_DEFAULT_RECIPIENT is required");
        }
        if self.is_production() && (self.secret_key.trim().is_empty() || self.secret_key == PLACEHOLDER_SECRET) {
            errors.push("Production SECRET_KEY must be set to a secure value");
        }

        errors
    }

    /// Fails on any problem unless debug mode is on, in which case the
    /// problems are handed back for the caller to log.
    pub fn check(&self) -> Result<Vec<&'static str>, ConfigError> {
        let problems = self.problems();
        if problems.is_empty() || self.debug {
            Ok(problems)
        } else {
            Err(ConfigError::Message(format!("Configuration errors: {}", problems.join(", "))))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn contact_enabled(&self) -> bool {
        !self.mail_username.trim().is_empty()
    }

    pub fn default_limits(&self) -> Result<Vec<RateLimitRule>, ConfigError> {
        parse_rules(&self.ratelimit_default)
            .map_err(|e| ConfigError::Message(format!("RATELIMIT_DEFAULT: {}", e)))
    }

    pub fn contact_limits(&self) -> Result<Vec<RateLimitRule>, ConfigError> {
        parse_rules(&self.ratelimit_contact)
            .map_err(|e| ConfigError::Message(format!("RATELIMIT_CONTACT: {}", e)))
    }

    pub fn mail(&self) -> MailConfig {
        let recipient = if self.mail_default_recipient.trim().is_empty() {
            self.mail_username.trim().to_string()
        } else {
            self.mail_default_recipient.trim().to_string()
        };

        MailConfig {
            server: self.mail_server.trim().to_string(),
            port: self.mail_port,
            use_tls: self.mail_use_tls,
            username: self.mail_username.trim().to_string(),
            password: Zeroizing::new(self.mail_password.clone()),
            recipient,
        }
    }
}

/// Outbound mail settings, built once at startup and owned by the notifier.
#[derive(Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: String,
    pub password: Zeroizing<String>,
    pub recipient: String,
}

impl MailConfig {
    pub fn is_complete(&self) -> bool {
        !self.server.is_empty()
            && !self.username.is_empty()
            && !self.password.is_empty()
            && !self.recipient.is_empty()
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("site_name", &self.site_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("worker_count", &self.worker_count)
            .field("debug", &self.debug)
            .field("secret_key", &self.secret_key.redact())
            .field("mail_server", &self.mail_server)
            .field("mail_port", &self.mail_port)
            .field("mail_use_tls", &self.mail_use_tls)
            .field("mail_username", &self.mail_username)
            .field("mail_password", &self.mail_password.redact())
            .field("mail_default_recipient", &self.mail_default_recipient)
            .field("ratelimit_default", &self.ratelimit_default)
            .field("ratelimit_contact", &self.ratelimit_contact)
            .field("submissions_dir", &self.submissions_dir)
            .field("static_dir", &self.static_dir)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .finish()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("password", &self.password.as_str().redact())
            .field("recipient", &self.recipient)
            .finish()
    }
}
