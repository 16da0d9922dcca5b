//! Configuration for the bridge.

use std::env;
use std::fmt;

use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Environment variable the bearer token has always been read from.
pub const LEGACY_TOKEN_VAR: &str = "OLLAMA_BEARER_TOKEN";

/// Main configuration structure for the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// Upper bound for a whole engine call, including generation.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Static bearer token every protected route is checked against.
    #[serde(default)]
    pub bearer_token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "OLLAMA_BEARER_TOKEN is missing. Set it in the environment or .env \
         (or auth.bearer_token in config.toml)"
    )]
    MissingBearerToken,
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5051
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_request_timeout() -> u64 {
    300
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `.env`, file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. `OLLAMA_BEARER_TOKEN` for the bearer token
    /// 2. Environment variables (BRIDGE__SECTION__KEY format)
    /// 3. config.toml file (if present)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is fine, the variables may come from the process.
        let _ = dotenvy::dotenv();

        let builder = Self::defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("BRIDGE")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder, env::var(LEGACY_TOKEN_VAR).ok())
    }

    pub(crate) fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        ConfigLoader::builder()
            .set_default("api.host", default_host())?
            .set_default("api.port", default_port() as i64)?
            .set_default("ollama.base_url", default_ollama_url())?
            .set_default("logging.level", default_log_level())
    }

    /// Build the final configuration, applying the legacy token override and
    /// refusing to continue without a bearer token.
    ///
    /// Surrounding whitespace is stripped from the token, so the stored value
    /// is exactly what clients must present.
    pub(crate) fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        legacy_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: Config = builder.build()?.try_deserialize()?;

        if let Some(token) = legacy_token.filter(|t| !t.trim().is_empty()) {
            config.auth.bearer_token = token;
        }

        config.auth.bearer_token = config.auth.bearer_token.trim().to_string();
        if config.auth.bearer_token.is_empty() {
            return Err(ConfigError::MissingBearerToken);
        }

        Ok(config)
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
