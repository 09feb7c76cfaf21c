//! Commerce API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_SHORT_CODE` - Region short code (e.g., kv7kzm78)
//! - `COMMERCE_ORGANIZATION_ID` - Tenant organization (e.g., `f_ecom_zzrf_001`)
//! - `COMMERCE_SITE_ID` - Storefront site (e.g., `RefArch`)
//!
//! ## Optional
//! - `COMMERCE_BASE_URL` - Override the API host (default: derived from short code)
//! - `COMMERCE_LOCALE` - Locale sent with every request (e.g., en-US)
//! - `COMMERCE_CURRENCY` - ISO 4217 currency for new baskets
//! - `COMMERCE_ACCESS_TOKEN` - Shopper bearer token
//! - `COMMERCE_CUSTOMER_ID` - Customer the token belongs to
//! - `COMMERCE_USID` - Unique shopper ID the token belongs to
//! - `COMMERCE_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `COMMERCE_CACHE_CAPACITY` - Query cache max entries (default: 1000)
//! - `LOG_FORMAT` - `json` or `text` (default: text)

use std::collections::HashMap;
use std::time::Duration;

use commerce_query_core::{CurrencyCode, CustomerId, OrganizationId, SiteId, Usid};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Placeholder prefixes rejected for hand-written values (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format for binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Query cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// How long an entry lives before it is evicted regardless of staleness.
    pub time_to_live: Duration,
    /// Maximum number of cached query results.
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            time_to_live: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Commerce API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CommerceConfig {
    /// Region short code, used to derive the API host.
    pub short_code: String,
    /// Tenant organization ID.
    pub organization_id: OrganizationId,
    /// Site ID sent as the `siteId` query parameter.
    pub site_id: SiteId,
    /// Explicit API base URL (tests, proxies).
    pub base_url: Option<String>,
    /// Locale sent as the `locale` query parameter.
    pub locale: Option<String>,
    /// Currency for newly created baskets.
    pub currency: Option<CurrencyCode>,
    /// Shopper bearer token.
    pub access_token: Option<SecretString>,
    /// Customer the token was issued to.
    pub customer_id: Option<CustomerId>,
    /// Unique shopper ID the token was issued to.
    pub usid: Option<Usid>,
    /// Query cache sizing.
    pub cache: CacheSettings,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for CommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceConfig")
            .field("short_code", &self.short_code)
            .field("organization_id", &self.organization_id)
            .field("site_id", &self.site_id)
            .field("base_url", &self.base_url)
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("customer_id", &self.customer_id)
            .field("usid", &self.usid)
            .field("cache", &self.cache)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl CommerceConfig {
    /// Minimal configuration for a known API host, used by tests and tools.
    #[must_use]
    pub fn new(
        organization_id: impl Into<OrganizationId>,
        site_id: impl Into<SiteId>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            short_code: String::new(),
            organization_id: organization_id.into(),
            site_id: site_id.into(),
            base_url: Some(base_url.into()),
            locale: None,
            currency: None,
            access_token: None,
            customer_id: None,
            usid: None,
            cache: CacheSettings::default(),
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the access token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CommerceConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let short_code = env.required("COMMERCE_SHORT_CODE")?;
        let organization_id = OrganizationId::new(env.required("COMMERCE_ORGANIZATION_ID")?);
        let site_id = SiteId::new(env.required("COMMERCE_SITE_ID")?);

        let currency = env
            .optional("COMMERCE_CURRENCY")
            .map(|c| {
                CurrencyCode::parse(&c).map_err(|e| {
                    ConfigError::InvalidEnvVar("COMMERCE_CURRENCY".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let access_token = env
            .optional("COMMERCE_ACCESS_TOKEN")
            .map(|token| {
                validate_bearer_token(&token, "COMMERCE_ACCESS_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        let ttl = env.parsed_or("COMMERCE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let capacity = env.parsed_or("COMMERCE_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'json' or 'text', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            short_code,
            organization_id,
            site_id,
            base_url: env.optional("COMMERCE_BASE_URL"),
            locale: env.optional("COMMERCE_LOCALE"),
            currency,
            access_token,
            customer_id: env.optional("COMMERCE_CUSTOMER_ID").map(CustomerId::new),
            usid: env.optional("COMMERCE_USID").map(Usid::new),
            cache: CacheSettings {
                time_to_live: Duration::from_secs(ttl),
                max_capacity: capacity,
            },
            log_format,
        })
    }

    /// The API base URL: the explicit override, or the host derived from the
    /// short code.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            format!(
                "https://{}.api.commercecloud.salesforce.com",
                self.short_code
            )
        })
    }

    /// Exposes the configured token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(ExposeSecret::expose_secret)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a parsed variable with a default value.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |v| {
            v.parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate a bearer token read from the environment.
///
/// Tokens are opaque base64url strings, so placeholder words are only
/// matched at the start of the value: a real token may contain `xXx` or
/// `todo` anywhere in its payload or signature.
fn validate_bearer_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "bearer token must not contain whitespace".to_string(),
        ));
    }

    let lower = token.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS
        .iter()
        .find(|pattern| lower.starts_with(*pattern))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (starts with '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(token);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
