//! Server configuration from environment variables.
//!
//! | Variable                      | Default          |
//! |-------------------------------|------------------|
//! | `FARES_BIND_ADDR`             | `127.0.0.1:3000` |
//! | `FARES_CACHE_TTL_SECS`        | `600`            |
//! | `FARES_CACHE_CAPACITY`        | `1000`           |
//! | `FARES_PROVIDER_TIMEOUT_SECS` | `30`             |
//! | `FARES_MAX_SERVICES`          | `30`             |
//! | `FARES_USER_AGENT`            | `Mozilla/5.0`    |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_MAX_CAPACITY, DEFAULT_TTL_SECS};
use crate::providers::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ProviderConfig};

/// Default number of offerings returned by a service search.
pub const DEFAULT_MAX_SERVICES: usize = 30;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub max_services: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache: CacheConfig::default(),
            provider: ProviderConfig::default(),
            max_services: DEFAULT_MAX_SERVICES,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary lookup. Unset or blank
    /// variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_var(&get, "FARES_BIND_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let ttl_secs = positive(&get, "FARES_CACHE_TTL_SECS")?.unwrap_or(DEFAULT_TTL_SECS);
        let capacity = positive(&get, "FARES_CACHE_CAPACITY")?.unwrap_or(DEFAULT_MAX_CAPACITY);
        let timeout_secs =
            positive(&get, "FARES_PROVIDER_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_services = positive(&get, "FARES_MAX_SERVICES")?
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_SERVICES);
        let user_agent = get("FARES_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            bind_addr,
            cache: CacheConfig::default()
                .with_ttl(Duration::from_secs(ttl_secs))
                .with_max_capacity(capacity),
            provider: ProviderConfig::default()
                .with_timeout(timeout_secs)
                .with_user_agent(user_agent),
            max_services,
        })
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(var)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn positive(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match parse_var::<u64>(get, var)? {
        Some(0) => Err(ConfigError::Invalid {
            var,
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        }),
        other => Ok(other),
    }
}
