//! Configuration module for template-service.
//!
//! Every setting comes from an `APP_`-prefixed environment variable (or
//! `.env`), e.g. `APP_DB_HOST`.

use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::fmt;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "debug" | "development" => Ok(Environment::Dev),
            "test" => Ok(Environment::Test),
            "prod" | "release" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid server environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: Environment,
    pub shutdown_timeout: Duration,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Clone)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
}

const MASK: &str = "******";

// Hand-written so passwords never reach the logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &MASK)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &MASK)
            .finish()
    }
}

impl CacheConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self) -> String {
        format!(
            "redis://:{}@{}/",
            urlencoding::encode(&self.password),
            self.addr()
        )
    }
}

/// Flat view of the `APP_*` variables, as the loader sees them.
#[derive(Debug, Deserialize, Validate)]
pub struct Settings {
    #[validate(range(min = 1))]
    pub server_port: u16,
    #[validate(length(min = 1))]
    pub server_env: String,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub server_shutdown_timeout_secs: u64,

    #[validate(length(min = 1))]
    pub db_host: String,
    #[validate(range(min = 1))]
    pub db_port: u16,
    #[validate(length(min = 1))]
    pub db_user: String,
    #[validate(length(min = 1))]
    pub db_password: String,
    #[validate(length(min = 1))]
    pub db_name: String,
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub db_min_connections: u32,

    #[validate(length(min = 1))]
    pub cache_host: String,
    #[validate(range(min = 1))]
    pub cache_port: u16,
    #[validate(length(min = 1))]
    pub cache_password: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_shutdown_timeout_secs() -> u64 {
    15
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_service_name() -> String {
    "template-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TemplateConfig {
    pub fn from_env() -> Result<Self, AppError> {
        core_config::load_settings::<Settings>()?.try_into()
    }
}

impl TryFrom<Settings> for TemplateConfig {
    type Error = AppError;

    fn try_from(s: Settings) -> Result<Self, Self::Error> {
        let environment: Environment = s
            .server_env
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if s.db_min_connections > s.db_max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "db_min_connections ({}) exceeds db_max_connections ({})",
                s.db_min_connections,
                s.db_max_connections
            )));
        }

        Ok(TemplateConfig {
            service_name: s.service_name,
            log_level: s.log_level,
            otlp_endpoint: s.otlp_endpoint.filter(|e| !e.is_empty()),
            server: ServerConfig {
                port: s.server_port,
                environment,
                shutdown_timeout: Duration::from_secs(s.server_shutdown_timeout_secs),
            },
            database: DatabaseConfig {
                host: s.db_host,
                port: s.db_port,
                user: s.db_user,
                password: s.db_password,
                name: s.db_name,
                max_connections: s.db_max_connections,
                min_connections: s.db_min_connections,
            },
            cache: CacheConfig {
                host: s.cache_host,
                port: s.cache_port,
                password: s.cache_password,
            },
        })
    }
}
