//! Configuration management for Volt Dealer Suite
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with VOLT__ prefix
//! 4. Legacy deployment variables (PORT, VITE_DATABASE_*, VITE_NODE_ENV)

use std::time::Duration;

use config::{ConfigError, Environment, File, Map};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// How long a request may wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Token lifetime in seconds
    pub expiry_secs: i64,
}

/// Legacy variable names and the keys they override
const LEGACY_OVERRIDES: [(&str, &str); 7] = [
    ("PORT", "server.port"),
    ("VITE_DATABASE_HOST", "database.host"),
    ("VITE_DATABASE_PORT", "database.port"),
    ("VITE_DATABASE_NAME", "database.name"),
    ("VITE_DATABASE_USER", "database.user"),
    ("VITE_DATABASE_PASSWORD", "database.password"),
    ("VITE_NODE_ENV", "environment"),
];

impl Config {
    /// Load configuration from files and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit set of environment variables
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let environment = vars
            .get("VITE_NODE_ENV")
            .or_else(|| vars.get("VOLT__ENVIRONMENT"))
            .cloned()
            .unwrap_or_else(|| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3001)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "volt_dealer_suite")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "password")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("jwt.expiry_secs", 86400)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (VOLT__ prefix)
            .add_source(
                Environment::with_prefix("VOLT")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in LEGACY_OVERRIDES {
            builder = builder.set_override_option(key, vars.get(var).cloned())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl DatabaseConfig {
    /// Connection options; production connections require TLS without
    /// certificate verification.
    pub fn connect_options(&self, production: bool) -> PgConnectOptions {
        let ssl_mode = if production {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// `name@host:port`, safe to log
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.name, self.host, self.port)
    }
}
