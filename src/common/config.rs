// src/common/config.rs
//! Application configuration
//!
//! Configuration is read once at startup into an immutable [`Config`] that is
//! shared with every handler through `AppState`. Environment variables are
//! validated field by field: in production any invalid field aborts startup,
//! everywhere else it is logged and the field is treated as unset.

use reqwest::Url;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use super::validation::{non_blank, ValidationResult};

pub const APP_NAME: &str = "Starter API";
pub const APP_DESCRIPTION: &str =
    "Starter web API: echo endpoint, user collection and hosted-auth passthrough";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:5173";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variables: {0}")]
    Invalid(String),

    #[error("Missing required environment variables: {0}")]
    Missing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(AppEnv::Development),
            "production" => Ok(AppEnv::Production),
            "test" => Ok(AppEnv::Test),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        };
        f.write_str(name)
    }
}

/// Which `UserStore` implementation backs `/api/users`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersBackend {
    Mock,
    Database,
}

impl FromStr for UsersBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(UsersBackend::Mock),
            "database" => Ok(UsersBackend::Database),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    pub enable_analytics: bool,
    pub enable_debug_mode: bool,
    pub enable_performance_monitoring: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Lifetime of the session cookies handed out after sign-in
    pub session_timeout: Duration,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_timeout: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Connection settings for the hosted identity provider
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: Option<Url>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("anon_key", &self.anon_key.as_ref().map(|_| "***"))
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Ensure a connection string is present before a pool is built
    pub fn validate(&self) -> Result<&str, ConfigError> {
        self.url
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: AppEnv,
    pub base_url: Url,
    pub api_url: Url,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub users_backend: UsersBackend,
    pub supabase: SupabaseConfig,
    pub database: DatabaseConfig,
    pub features: FeatureFlags,
    pub limits: Limits,
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = ValidationResult::new();
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let env = match get("APP_ENV") {
            None => AppEnv::Development,
            Some(raw) => raw.parse::<AppEnv>().unwrap_or_else(|_| {
                errors.add_error(
                    "APP_ENV",
                    "must be one of development, production, test",
                );
                AppEnv::Development
            }),
        };
        let is_production = env == AppEnv::Production;

        let mut url_field = |key: &str| match get(key) {
            None => None,
            Some(raw) => match Url::parse(raw.trim()) {
                Ok(url) => Some(url),
                Err(_) => {
                    errors.add_error(key, "must be a valid URL");
                    None
                }
            },
        };
        let supabase_url = url_field("SUPABASE_URL");
        let base_url = url_field("BASE_URL");
        let api_url = url_field("API_URL");

        let key_field = |key: &str| non_blank(lookup(key).as_deref()).map(str::to_string);

        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                errors.add_error("PORT", "must be a port number");
                DEFAULT_PORT
            }),
        };

        let users_backend = match get("USERS_BACKEND") {
            None => UsersBackend::Mock,
            Some(raw) => raw.parse::<UsersBackend>().unwrap_or_else(|_| {
                errors.add_error("USERS_BACKEND", "must be one of mock, database");
                UsersBackend::Mock
            }),
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let flag = |key: &str| get(key).is_some_and(|v| v.trim() == "true");

        if !errors.is_valid {
            if is_production {
                return Err(ConfigError::Invalid(errors.summary()));
            }
            for error in &errors.errors {
                warn!(
                    field = %error.field,
                    reason = %error.message,
                    "Invalid environment variable ignored outside production"
                );
            }
        }

        let base_url = match base_url {
            Some(url) => url,
            None => default_url(DEFAULT_BASE_URL)?,
        };
        let api_url = match api_url {
            Some(url) => url,
            None => default_url(DEFAULT_API_URL)?,
        };

        Ok(Config {
            env,
            base_url,
            api_url,
            port,
            cors_origins,
            users_backend,
            supabase: SupabaseConfig {
                url: supabase_url,
                anon_key: key_field("SUPABASE_ANON_KEY"),
                service_role_key: key_field("SUPABASE_SERVICE_ROLE_KEY"),
            },
            database: DatabaseConfig {
                url: key_field("DATABASE_URL"),
                max_connections: 20,
                idle_timeout: Duration::from_secs(30),
                acquire_timeout: Duration::from_secs(2),
            },
            features: FeatureFlags {
                enable_analytics: flag("ENABLE_ANALYTICS"),
                enable_debug_mode: env == AppEnv::Development,
                enable_performance_monitoring: flag("ENABLE_PERFORMANCE"),
            },
            limits: Limits::default(),
            security: SecurityConfig::default(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnv::Production
    }

    pub fn is_supabase_configured(&self) -> bool {
        self.supabase.url.is_some() && self.supabase.anon_key.is_some()
    }

    pub fn is_database_configured(&self) -> bool {
        self.database.url.is_some()
    }
}

fn default_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid(format!("default URL {raw}: {e}")))
}

/// Build a lookup over a fixed set of pairs
#[cfg(test)]
pub fn lookup_from_pairs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}
