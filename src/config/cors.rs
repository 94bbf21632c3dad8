use actix_web::http::header::HeaderValue;

use super::parse_or;
use crate::core::Result;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "*";
pub const DEFAULT_ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH";
pub const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-API-Key, x-api-key";
/// 24 hours
pub const DEFAULT_MAX_AGE: u32 = 86_400;

/// Cross-origin policy applied by the CORS middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    /// `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
    pub allowed_methods: String,
    pub allowed_headers: String,
    pub max_age: u32,
    pub allow_credentials: bool,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGINS.to_string()],
            allowed_methods: DEFAULT_ALLOWED_METHODS.to_string(),
            allowed_headers: DEFAULT_ALLOWED_HEADERS.to_string(),
            max_age: DEFAULT_MAX_AGE,
            allow_credentials: true,
        }
    }
}

impl CorsPolicy {
    /// Read the policy from `CORS_*` variables.
    ///
    /// Unset variables take the defaults. The first unusable value is an
    /// error; callers decide whether to fall back to [`CorsPolicy::default`].
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => split_list(&raw),
            None => defaults.allowed_origins,
        };
        let policy = Self {
            allowed_origins,
            allowed_methods: lookup("CORS_ALLOWED_METHODS").unwrap_or(defaults.allowed_methods),
            allowed_headers: lookup("CORS_ALLOWED_HEADERS").unwrap_or(defaults.allowed_headers),
            max_age: parse_or(lookup, "CORS_MAX_AGE", defaults.max_age)?,
            allow_credentials: parse_or(lookup, "CORS_ALLOW_CREDENTIALS", defaults.allow_credentials)?,
        };
        policy.validate()?;
        Ok(policy)
    }

    fn validate(&self) -> Result<()> {
        use crate::core::AppError;

        if self.allowed_origins.is_empty() {
            return Err(AppError::Configuration(
                "CORS_ALLOWED_ORIGINS must list at least one origin".to_string(),
            ));
        }
        let values = self
            .allowed_origins
            .iter()
            .chain([&self.allowed_methods, &self.allowed_headers]);
        for value in values {
            HeaderValue::from_str(value).map_err(|_| {
                AppError::Configuration(format!("'{}' is not a valid header value", value))
            })?;
        }
        Ok(())
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Value for `Access-Control-Allow-Origin` given the request's `Origin`
    pub fn allow_origin_for(&self, origin: Option<&str>) -> Option<String> {
        if self.allows_any_origin() {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.allowed_origins
            .iter()
            .find(|allowed| allowed.eq_ignore_ascii_case(origin))
            .map(|_| origin.to_string())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
