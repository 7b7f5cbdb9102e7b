//! Runtime configuration read from environment variables.
//!
//! Everything is read once at startup into a [`Config`]; nothing downstream
//! looks at the process environment again. [`Config::from_lookup`] takes the
//! variable source as a function so tests can supply their own.

use std::fmt;
use std::net::SocketAddr;
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "https://min-api.cryptocompare.com/data/v2/news/?lang=EN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Deployment environment flag.
///
/// Only the exact string `"production"` selects [`Environment::Production`];
/// anything else, including `"Production"` or an empty string, is treated as
/// non-production and kept verbatim for logging.
///
/// # Examples
///
/// ```
/// use crypto_news::config::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert!(env.is_production());
///
/// let env: Environment = "staging".parse().unwrap();
/// assert!(!env.is_production());
/// assert_eq!(env.as_str(), "staging");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Other(String),
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Production => "production",
            Self::Other(name) => name,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Other("development".to_owned())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "production" => Self::Production,
            other => Self::Other(other.to_owned()),
        })
    }
}

/// Errors produced while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}: {source}")]
    InvalidInteger {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{var} must be a socket address like 127.0.0.1:3000, got {value:?}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `APP_ENV`
    pub environment: Environment,
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `NEWS_UPSTREAM_URL`
    pub upstream_url: String,
    /// `NEWS_REVALIDATE_SECS`; `None` leaves the choice to the fetch policy.
    pub revalidate_secs: Option<u64>,
    /// `NEWS_TIMEOUT_SECS`
    pub upstream_timeout: Duration,
}

impl Config {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first variable that is present but
    /// unusable. Absent variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|v| match v.parse::<Environment>() {
                Ok(env) => env,
                Err(never) => match never {},
            })
            .unwrap_or_default();

        let bind_value = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let upstream_url =
            lookup("NEWS_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_owned());
        if upstream_url.trim().is_empty() {
            return Err(ConfigError::Empty {
                var: "NEWS_UPSTREAM_URL",
            });
        }

        let revalidate_secs = parse_u64(&lookup, "NEWS_REVALIDATE_SECS")?;
        let timeout_secs =
            parse_u64(&lookup, "NEWS_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            environment,
            bind_addr,
            upstream_url,
            revalidate_secs,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidInteger {
                    var,
                    value,
                    source,
                })
        })
        .transpose()
}
