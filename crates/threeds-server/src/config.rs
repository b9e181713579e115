use std::env;
use std::time::Duration;
use url::Url;

use threeds::constants::DEFAULT_API_URL;

const DEFAULT_MERCHANT_URL: &str = "http://localhost:8085";
const DEFAULT_PORT: u16 = 8085;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRANSACTION_TTL_SECS: u64 = 3600;
const DEFAULT_RATE_LIMIT_RPM: u64 = 120;

#[derive(Clone)]
pub struct ServerConfig {
    /// API key for the remote 3DS server
    pub api_key: String,
    /// Base URL of the remote 3DS server
    pub api_url: String,
    /// Public base URL of this merchant back-end (notification URLs hang off it)
    pub merchant_url: String,
    /// Listen port
    pub port: u16,
    /// Deadline for each call to the 3DS server
    pub request_timeout: Duration,
    /// Age after which transaction records are evicted
    pub transaction_ttl: Duration,
    /// CORS allowed origins (`*` = any)
    pub allowed_origins: Vec<String>,
    /// Rate limit requests per minute per IP
    pub rate_limit_rpm: u64,
    /// Directory to serve the demo front-end from (None = don't serve)
    pub static_dir: Option<String>,
    /// Bearer token required for /metrics (None = public)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("merchant_url", &self.merchant_url)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("transaction_ttl", &self.transaction_ttl)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field("static_dir", &self.static_dir)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Required: API key
        let api_key = var("RAVELIN_API_KEY").ok_or(ConfigError::MissingRequired("RAVELIN_API_KEY"))?;

        let api_url = var("RAVELIN_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).map_err(|_| ConfigError::InvalidUrl(api_url.clone()))?;

        let merchant_url =
            var("MERCHANT_URL").unwrap_or_else(|| DEFAULT_MERCHANT_URL.to_string());
        let parsed_merchant_url =
            Url::parse(&merchant_url).map_err(|_| ConfigError::InvalidUrl(merchant_url.clone()))?;

        // An explicit port in the merchant URL wins over $PORT.
        let port = match parsed_merchant_url.port() {
            Some(port) => port,
            None => match var("PORT") {
                Some(p) => p.parse().map_err(|_| ConfigError::InvalidNumber("PORT", p))?,
                None => DEFAULT_PORT,
            },
        };

        let request_timeout =
            Duration::from_secs(parse_u64(&var, "RAVELIN_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidNumber(
                "RAVELIN_TIMEOUT_SECS",
                "0".to_string(),
            ));
        }

        let transaction_ttl = Duration::from_secs(parse_u64(
            &var,
            "TRANSACTION_TTL_SECS",
            DEFAULT_TRANSACTION_TTL_SECS,
        )?);
        if transaction_ttl.is_zero() {
            return Err(ConfigError::InvalidNumber(
                "TRANSACTION_TTL_SECS",
                "0".to_string(),
            ));
        }

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let rate_limit_rpm = parse_u64(&var, "RATE_LIMIT_RPM", DEFAULT_RATE_LIMIT_RPM)?;

        let static_dir = var("STATIC_DIR");

        let metrics_token = var("METRICS_TOKEN");

        Ok(Self {
            api_key,
            api_url,
            merchant_url: merchant_url.trim_end_matches('/').to_string(),
            port,
            request_timeout,
            transaction_ttl,
            allowed_origins,
            rate_limit_rpm,
            static_dir,
            metrics_token,
        })
    }
}

fn parse_u64<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key, value)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {0}: {1}")]
    InvalidNumber(&'static str, String),
}
