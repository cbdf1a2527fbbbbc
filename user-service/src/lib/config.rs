use std::env;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::user::service::UserServiceSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub ttl_seconds: i64,
}

/// Argon2id work factor.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2_defaults::MEMORY_KIB,
            iterations: argon2_defaults::ITERATIONS,
            parallelism: argon2_defaults::PARALLELISM,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Re-fetch the user on every token verification.
    #[serde(default)]
    pub refresh_identity: bool,
}

// OWASP-recommended Argon2id baseline, matching the argon2 crate defaults.
mod argon2_defaults {
    pub const MEMORY_KIB: u32 = 19 * 1024;
    pub const ITERATIONS: u32 = 2;
    pub const PARALLELISM: u32 = 1;
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

/// Upper bound on `jwt.ttl_seconds` (ten years).
const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Unprefixed environment variables, nested keys joined by `__`.
fn environment() -> Environment {
    Environment::default().separator("__")
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, STORE__TIMEOUT_MS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(environment())
            .build()?;

        Self::from_settings(configuration)
    }

    /// Deserialize and validate already-layered settings.
    pub fn from_settings(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.jwt.ttl_seconds < 0 {
            return Err(ConfigError::Message(
                "jwt.ttl_seconds must not be negative".into(),
            ));
        }
        if self.jwt.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Message(format!(
                "jwt.ttl_seconds must be at most {}",
                MAX_TOKEN_TTL_SECONDS
            )));
        }
        if self.store.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "store.timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Build the process-wide authenticator from the signing and hashing
    /// settings.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Unsupported algorithm, invalid work factor
    ///   or token lifetime out of range
    pub fn authenticator(&self) -> Result<Authenticator, ConfigError> {
        let token_ttl = chrono::Duration::try_seconds(self.jwt.ttl_seconds)
            .ok_or_else(|| ConfigError::Message("jwt.ttl_seconds out of range".into()))?;

        let jwt_handler =
            JwtHandler::with_algorithm(self.jwt.secret.as_bytes(), &self.jwt.algorithm)
                .map_err(|e| ConfigError::Message(format!("jwt.algorithm: {}", e)))?;

        let password_hasher = PasswordHasher::with_work_factor(
            self.password.memory_kib,
            self.password.iterations,
            self.password.parallelism,
        )
        .map_err(|e| ConfigError::Message(format!("password: {}", e)))?;

        Ok(Authenticator::new(
            password_hasher,
            jwt_handler,
            token_ttl,
        ))
    }

    /// Settings for the user service derived from this configuration.
    pub fn service_settings(&self) -> UserServiceSettings {
        UserServiceSettings {
            store_timeout: Duration::from_millis(self.store.timeout_ms),
            refresh_identity: self.auth.refresh_identity,
        }
    }
}
