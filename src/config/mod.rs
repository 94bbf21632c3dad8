use std::env;
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, HotelClock, Result};

pub mod cors;
pub mod server;

pub use cors::CorsPolicy;
pub use server::ServerConfig;

/// Main application configuration
///
/// Built once at startup and handed to the middleware and services that need
/// it; nothing reads the environment at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub cors: CorsPolicy,
    /// Why `cors` fell back to the defaults, reported once logging is up
    pub cors_fallback: Option<String>,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

/// Expected API credential
#[derive(Clone, PartialEq, Eq)]
pub enum ApiCredential {
    /// Shared secret compared in constant time
    Plain(String),
    /// Argon2 PHC string of the shared secret
    Argon2Hash(String),
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiCredential::Plain(_) => f.write_str("Plain(***)"),
            ApiCredential::Argon2Hash(_) => f.write_str("Argon2Hash(***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub api_key: ApiCredential,
}

impl SecurityConfig {
    pub fn plain(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiCredential::Plain(api_key.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Odoo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "odoo" => Ok(StoreBackend::Odoo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "Unknown RECORD_STORE '{}', expected 'odoo' or 'memory'",
                other
            ))),
        }
    }
}

/// Connection settings for the Odoo JSON-RPC API
#[derive(Clone)]
pub struct OdooConfig {
    pub url: String,
    pub database: String,
    pub login: String,
    pub password: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for OdooConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("login", &self.login)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub odoo: OdooConfig,
    /// QWeb report rendered by the print-bill endpoint
    pub bill_report: String,
    /// Hotel offset from UTC, in minutes, for "today"
    pub utc_offset_minutes: i32,
}

impl StoreConfig {
    pub fn clock(&self) -> HotelClock {
        HotelClock::from_offset_minutes(self.utc_offset_minutes)
    }
}

pub const DEFAULT_BILL_REPORT: &str = "aac_hotel_api.report_booking_receipt";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let security = match (lookup("HOTEL_API_KEY_HASH"), lookup("HOTEL_API_KEY")) {
            (Some(hash), _) => SecurityConfig {
                api_key: ApiCredential::Argon2Hash(hash),
            },
            (None, Some(key)) => SecurityConfig::plain(key),
            (None, None) => {
                return Err(AppError::Configuration(
                    "HOTEL_API_KEY or HOTEL_API_KEY_HASH must be set".to_string(),
                ))
            }
        };

        let backend: StoreBackend = lookup("RECORD_STORE")
            .unwrap_or_else(|| "odoo".to_string())
            .parse()?;

        // A bad CORS variable must not keep the service down
        let (cors, cors_fallback) = match CorsPolicy::from_lookup(&lookup) {
            Ok(policy) => (policy, None),
            Err(e) => (CorsPolicy::default(), Some(e.to_string())),
        };

        let config = Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            server: ServerConfig::from_lookup(&lookup)?,
            security,
            cors,
            cors_fallback,
            store: StoreConfig {
                backend,
                odoo: OdooConfig {
                    url: lookup("ODOO_URL").unwrap_or_default(),
                    database: lookup("ODOO_DB").unwrap_or_default(),
                    login: lookup("ODOO_LOGIN").unwrap_or_default(),
                    password: lookup("ODOO_PASSWORD").unwrap_or_default(),
                    timeout_secs: parse_or(&lookup, "ODOO_TIMEOUT_SECS", 30)?,
                },
                bill_report: lookup("BILL_REPORT")
                    .unwrap_or_else(|| DEFAULT_BILL_REPORT.to_string()),
                utc_offset_minutes: parse_or(&lookup, "HOTEL_UTC_OFFSET_MINUTES", 0)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        let secret = match &self.security.api_key {
            ApiCredential::Plain(key) | ApiCredential::Argon2Hash(key) => key,
        };
        if secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "API key must not be empty".to_string(),
            ));
        }
        if let ApiCredential::Argon2Hash(hash) = &self.security.api_key {
            argon2::PasswordHash::new(hash).map_err(|e| {
                AppError::Configuration(format!("Invalid HOTEL_API_KEY_HASH: {}", e))
            })?;
        }

        if self.store.backend == StoreBackend::Odoo {
            if self.store.odoo.url.is_empty() {
                return Err(AppError::Configuration(
                    "ODOO_URL must be set when RECORD_STORE=odoo".to_string(),
                ));
            }
            if self.store.odoo.timeout_secs == 0 {
                return Err(AppError::Configuration(
                    "ODOO_TIMEOUT_SECS must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Parse `key` if set, otherwise return `default`
pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
