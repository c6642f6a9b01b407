//! Gateway configuration.
//!
//! [`GatewayConfig`] is an explicit value handed to the invoker and the HTTP
//! router at construction time. It is loaded once from the environment by the
//! binary; tests build it directly or through [`GatewayConfig::from_lookup`]
//! so they never touch the process environment.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the backend endpoint name.
pub const ENV_ENDPOINT_NAME: &str = "SAGEMAKER_ENDPOINT_NAME";
/// Environment variable holding the backend region.
pub const ENV_REGION: &str = "AWS_REGION";
/// Environment variable overriding the backend base URL.
pub const ENV_BACKEND_URL: &str = "SAGEGATE_BACKEND_URL";
/// Environment variable holding the backend call deadline in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SAGEGATE_TIMEOUT_SECS";
/// Environment variable holding the default `max_tokens`.
pub const ENV_DEFAULT_MAX_TOKENS: &str = "SAGEGATE_DEFAULT_MAX_TOKENS";
/// Environment variable holding the `max_tokens` ceiling.
pub const ENV_MAX_TOKENS_LIMIT: &str = "SAGEGATE_MAX_TOKENS_LIMIT";
/// Environment variable holding the default sampling temperature.
pub const ENV_DEFAULT_TEMPERATURE: &str = "SAGEGATE_DEFAULT_TEMPERATURE";
/// Environment variable holding the listen address.
pub const ENV_BIND: &str = "SAGEGATE_BIND";

/// Default backend region.
pub const DEFAULT_REGION: &str = "eu-north-1";
/// Default backend call deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default `max_tokens` when a request omits it.
pub const DEFAULT_MAX_TOKENS: u32 = 50;
/// Upper bound applied to requested `max_tokens`.
pub const DEFAULT_MAX_TOKENS_LIMIT: u32 = 4096;
/// Default sampling temperature when a request omits it.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Highest accepted sampling temperature.
pub const MAX_TEMPERATURE: f64 = 2.0;
/// Default listen address for the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("{0} is not configured")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Generation parameters applied when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationDefaults {
    /// `max_tokens` used when the request has none.
    pub max_tokens: u32,
    /// Requested `max_tokens` above this are clamped down.
    pub max_tokens_limit: u32,
    /// Temperature used when the request has none.
    pub temperature: f64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            max_tokens_limit: DEFAULT_MAX_TOKENS_LIMIT,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Process-wide gateway configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Backend endpoint identifier. Also reported as the `model` of every response.
    pub endpoint_name: String,
    /// Backend region, used to derive the default backend URL.
    pub region: String,
    /// Explicit backend base URL, overriding the region-derived one.
    pub backend_url: Option<String>,
    /// Deadline for a single backend call.
    pub timeout: Duration,
    /// Generation defaults and limits.
    pub generation: GenerationDefaults,
    /// Listen address for the HTTP server.
    pub bind_addr: String,
}

impl GatewayConfig {
    /// Create a configuration for `endpoint_name` with every other field defaulted.
    pub fn new(endpoint_name: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            region: DEFAULT_REGION.to_string(),
            backend_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            generation: GenerationDefaults::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint_name = get(ENV_ENDPOINT_NAME).ok_or(ConfigError::Missing(ENV_ENDPOINT_NAME))?;
        let mut config = Self::new(endpoint_name.trim());

        if let Some(region) = get(ENV_REGION) {
            config.region = region.trim().to_string();
        }
        config.backend_url = get(ENV_BACKEND_URL).map(|url| url.trim().to_string());
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            config.timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(value) = get(ENV_DEFAULT_MAX_TOKENS) {
            config.generation.max_tokens = parse_number(ENV_DEFAULT_MAX_TOKENS, &value)?;
        }
        if let Some(value) = get(ENV_MAX_TOKENS_LIMIT) {
            config.generation.max_tokens_limit = parse_number(ENV_MAX_TOKENS_LIMIT, &value)?;
        }
        if let Some(value) = get(ENV_DEFAULT_TEMPERATURE) {
            config.generation.temperature = parse_number(ENV_DEFAULT_TEMPERATURE, &value)?;
        }
        if let Some(bind) = get(ENV_BIND) {
            config.bind_addr = bind.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the backend call deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the backend base URL.
    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Override the backend region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Base URL the HTTP backend adapter talks to.
    #[must_use]
    pub fn effective_backend_url(&self) -> String {
        self.backend_url.as_ref().map_or_else(
            || format!("https://runtime.sagemaker.{}.amazonaws.com", self.region),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// Check that the configuration can serve requests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint_name.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_ENDPOINT_NAME));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_DEFAULT_MAX_TOKENS,
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.generation.max_tokens_limit < self.generation.max_tokens {
            return Err(ConfigError::Invalid {
                key: ENV_MAX_TOKENS_LIMIT,
                reason: format!(
                    "must be at least the default max_tokens ({})",
                    self.generation.max_tokens
                ),
            });
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid {
                key: ENV_DEFAULT_TEMPERATURE,
                reason: format!("must be between 0 and {MAX_TEMPERATURE}"),
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("'{raw}' is not a valid number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = GatewayConfig::from_lookup(lookup(&[(ENV_ENDPOINT_NAME, "gpt2-endpoint")]))
            .unwrap();

        assert_eq!(config.endpoint_name, "gpt2-endpoint");
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.generation.max_tokens, 50);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            config.effective_backend_url(),
            "https://runtime.sagemaker.eu-north-1.amazonaws.com"
        );
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[(ENV_REGION, "us-east-1")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_ENDPOINT_NAME));

        let err = GatewayConfig::from_lookup(lookup(&[(ENV_ENDPOINT_NAME, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_ENDPOINT_NAME));
    }

    #[test]
    fn test_overrides_are_read() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_NAME, "ep"),
            (ENV_REGION, "us-east-1"),
            (ENV_BACKEND_URL, "http://127.0.0.1:9000/"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_DEFAULT_MAX_TOKENS, "64"),
            (ENV_MAX_TOKENS_LIMIT, "128"),
            (ENV_DEFAULT_TEMPERATURE, "0.2"),
            (ENV_BIND, "127.0.0.1:3000"),
        ]))
        .unwrap();

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.effective_backend_url(), "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.generation.max_tokens, 64);
        assert_eq!(config.generation.max_tokens_limit, 128);
        assert!((config.generation.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_NAME, "ep"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_TIMEOUT_SECS));

        let err = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_NAME, "ep"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_TIMEOUT_SECS));

        let err = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_NAME, "ep"),
            (ENV_DEFAULT_TEMPERATURE, "3.5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_DEFAULT_TEMPERATURE));
    }

    #[test]
    fn test_limit_below_default_is_rejected() {
        let err = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT_NAME, "ep"),
            (ENV_MAX_TOKENS_LIMIT, "10"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_MAX_TOKENS_LIMIT));
    }

    #[test]
    fn test_builders() {
        let config = GatewayConfig::new("ep")
            .with_region("ap-south-1")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(
            config.effective_backend_url(),
            "https://runtime.sagemaker.ap-south-1.amazonaws.com"
        );
        assert_eq!(config.timeout, Duration::from_millis(250));

        let config = config.with_backend_url("http://localhost:8081");
        assert_eq!(config.effective_backend_url(), "http://localhost:8081");
        assert!(config.validate().is_ok());
    }
}
