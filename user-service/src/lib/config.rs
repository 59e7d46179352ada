use std::env;
use std::fmt;

use auth::JwtError;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    /// Maximum lifetime of a pooled connection; unlimited when absent
    #[serde(default)]
    pub max_lifetime_secs: Option<u64>,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of issued tokens, in seconds
    pub validity_secs: i64,
}

impl JwtConfig {
    /// Token lifetime as a duration.
    ///
    /// # Errors
    /// * `InvalidValidityWindow` - `validity_secs` does not fit in a `Duration`
    pub fn validity(&self) -> Result<Duration, JwtError> {
        Duration::try_seconds(self.validity_secs).ok_or(JwtError::InvalidValidityWindow)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("validity_secs", &self.validity_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Logging configuration.
///
/// `RUST_LOG`, when set, takes precedence over `level`. File output is
/// enabled only when `directory` is set.
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
    #[serde(default)]
    pub rotation: LogRotation,
}

impl LogConfig {
    fn default_level() -> String {
        "user_service=info,tower_http=info".to_string()
    }

    fn default_file() -> String {
        "user-service.log".to_string()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: LogFormat::default(),
            directory: None,
            file: Self::default_file(),
            rotation: LogRotation::default(),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from(&run_mode, Environment::default().separator("__"))
    }

    fn load_from(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
