use std::env;

use auth::HashCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::identity::models::SecretPolicy;

/// Application configuration for identity-service.
///
/// Loaded once at startup and handed to the components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub token: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

/// Argon2id cost and hashing concurrency.
///
/// Fields left out of the `[hashing]` section keep their defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    /// Hashes and verifications allowed to run at the same time.
    pub max_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CredentialsConfig {
    pub min_secret_length: usize,
    pub max_secret_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// HMAC key material. Required, no default.
    pub signing_key: String,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_ttl_seconds() -> i64 {
    24 * 60 * 60
}

fn default_issuer() -> String {
    "identity-service".to_string()
}

impl Default for HashingConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_cost_kib: cost.memory_kib,
            time_cost: cost.iterations,
            parallelism: cost.parallelism,
            max_concurrency: 4,
        }
    }
}

impl HashingConfig {
    pub fn cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_cost_kib,
            iterations: self.time_cost,
            parallelism: self.parallelism,
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            min_secret_length: SecretPolicy::DEFAULT_MIN_LENGTH,
            max_secret_length: SecretPolicy::DEFAULT_MAX_LENGTH,
        }
    }
}

impl CredentialsConfig {
    pub fn policy(&self) -> SecretPolicy {
        SecretPolicy::new(self.min_secret_length, self.max_secret_length)
    }
}

impl TokenConfig {
    pub const MIN_SIGNING_KEY_LENGTH: usize = 32;
    /// Ten years.
    pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

    pub fn ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_seconds(self.ttl_seconds).ok_or_else(|| {
            ConfigError::Message(format!(
                "token.ttl_seconds ({}) is out of range",
                self.ttl_seconds
            ))
        })
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `PORT` (overrides server.http_port)
    /// 2. Environment variables (TOKEN__SIGNING_KEY, DATABASE__URL, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 3000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .set_override_option("server.http_port", env::var("PORT").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.signing_key.len() < TokenConfig::MIN_SIGNING_KEY_LENGTH {
            return Err(ConfigError::Message(format!(
                "token.signing_key must be at least {} bytes",
                TokenConfig::MIN_SIGNING_KEY_LENGTH
            )));
        }
        if self.token.ttl_seconds <= 0 || self.token.ttl_seconds > TokenConfig::MAX_TTL_SECONDS {
            return Err(ConfigError::Message(format!(
                "token.ttl_seconds must be between 1 and {}",
                TokenConfig::MAX_TTL_SECONDS
            )));
        }
        if self.credentials.min_secret_length == 0
            || self.credentials.min_secret_length > self.credentials.max_secret_length
        {
            return Err(ConfigError::Message(format!(
                "credentials.min_secret_length ({}) must be between 1 and max_secret_length ({})",
                self.credentials.min_secret_length, self.credentials.max_secret_length
            )));
        }
        if self.hashing.max_concurrency == 0 {
            return Err(ConfigError::Message(
                "hashing.max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
