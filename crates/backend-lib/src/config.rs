// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "SHOPFRONT_";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

const MIN_SECRET_LENGTH: usize = 16;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Directory holding the flat-file store
    pub data_dir: PathBuf,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: LogFormat,
    /// Secret used to sign session tokens
    #[serde(deserialize_with = "deserialize_secret")]
    pub app_secret: SecretString,
    /// Base URL of the storefront, used to build reset links
    pub frontend_url: String,
    /// Serve the GraphiQL explorer on `GET /graphql`
    pub graphiql: bool,
    /// Session cookie settings
    pub cookie: CookieSettings,
    /// Outgoing mail settings
    pub mail: MailSettings,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Session cookie settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Cookie name carrying the session token
    pub name: String,
    /// Only send the cookie over HTTPS
    pub secure: bool,
}

/// Outgoing mail settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// Sender address for transactional mail
    pub from: String,
    /// SMTP relay; mail is only logged when absent
    pub smtp: Option<SmtpSettings>,
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
}

fn default_smtp_port() -> u16 {
    587
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4444)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            app_secret: SecretString::from(String::new()),
            frontend_url: "http://localhost:7777".to_string(),
            graphiql: false,
            cookie: CookieSettings::default(),
            mail: MailSettings::default(),
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "token".to_string(),
            secure: false,
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from: "shop@localhost".to_string(),
            smtp: None,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from an explicit TOML file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path.as_ref())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// File-only figment, without environment overrides
    pub fn figment(path: &Path) -> Figment {
        Figment::new().merge(Toml::file(path))
    }

    /// Check settings for values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }

        if self.app_secret.expose_secret().len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "app_secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        if self.frontend_url.trim().is_empty() {
            return Err(ConfigError::Invalid("frontend_url must be set".to_string()));
        }

        if self.mail.from.trim().is_empty() {
            return Err(ConfigError::Invalid("mail.from must be set".to_string()));
        }

        Ok(())
    }

    /// Reset link mailed to users, without the token query value
    pub fn reset_url(&self) -> String {
        format!("{}/reset", self.frontend_url.trim_end_matches('/'))
    }
}
