//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Capacity of the default cache profile, used when `CACHE_BACKEND` is unset
pub const DEFAULT_LOCAL_MAX_SIZE: usize = 1000;

// == Backend Kind ==
/// The cache backend variant selected for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process cache bounded by entry count, LRU eviction
    BoundedLocal,
    /// Grid-backed cache with TTL, max-idle and max-size limits
    DistributedTtl,
    /// In-process map that never evicts
    UnboundedLocal,
    /// No caching at all
    Disabled,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::BoundedLocal => "bounded-local",
            BackendKind::DistributedTtl => "distributed-ttl",
            BackendKind::UnboundedLocal => "unbounded-local",
            BackendKind::Disabled => "disabled",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bounded-local" => Ok(BackendKind::BoundedLocal),
            "distributed-ttl" => Ok(BackendKind::DistributedTtl),
            "unbounded-local" => Ok(BackendKind::UnboundedLocal),
            "disabled" | "none" => Ok(BackendKind::Disabled),
            other => Err(AppError::ConfigurationInvalid(format!(
                "unrecognized cache backend '{}'",
                other
            ))),
        }
    }
}

// == Cache Settings ==
/// Eviction parameters for the selected backend.
///
/// Which fields are required depends on `kind`; the backend selector
/// validates them before anything is instantiated.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub kind: BackendKind,
    /// Maximum number of entries (0 disables the bound for distributed-ttl)
    pub max_size: Option<usize>,
    /// Lifetime since insertion (zero disables the bound)
    pub ttl: Option<Duration>,
    /// Lifetime since last access (zero disables the bound)
    pub max_idle: Option<Duration>,
}

impl CacheSettings {
    pub fn bounded_local(max_size: usize) -> Self {
        Self {
            kind: BackendKind::BoundedLocal,
            max_size: Some(max_size),
            ttl: None,
            max_idle: None,
        }
    }

    pub fn distributed_ttl(ttl: Duration, max_idle: Duration, max_size: usize) -> Self {
        Self {
            kind: BackendKind::DistributedTtl,
            max_size: Some(max_size),
            ttl: Some(ttl),
            max_idle: Some(max_idle),
        }
    }

    pub fn unbounded_local() -> Self {
        Self {
            kind: BackendKind::UnboundedLocal,
            max_size: None,
            ttl: None,
            max_idle: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            kind: BackendKind::Disabled,
            max_size: None,
            ttl: None,
            max_idle: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::bounded_local(DEFAULT_LOCAL_MAX_SIZE)
    }
}

/// Service configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Number of products written to the store at startup
    pub catalog_size: usize,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Cache backend selection and eviction parameters
    pub cache: CacheSettings,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CATALOG_SIZE` - Products seeded at startup (default: 5000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `CACHE_BACKEND` - `bounded-local`, `distributed-ttl`, `unbounded-local` or `disabled`
    ///   (default: bounded-local with 1000 entries)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries, required when a sized backend is chosen
    /// - `CACHE_TTL_MS` - Time-to-live in milliseconds
    /// - `CACHE_MAX_IDLE_MS` - Maximum idle time in milliseconds
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    ///
    /// Server settings fall back to defaults when malformed; cache settings
    /// are strict since a wrong cache setup must stop the process.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let explicit_kind = lookup("CACHE_BACKEND")
            .map(|value| value.parse::<BackendKind>())
            .transpose()?;
        let kind = explicit_kind.unwrap_or(defaults.cache.kind);

        let mut max_size = parse_strict::<usize>(&lookup, "CACHE_MAX_SIZE")?;
        if max_size.is_none() {
            match explicit_kind {
                // Default profile only
                None => max_size = defaults.cache.max_size,
                Some(BackendKind::BoundedLocal) => {
                    return Err(AppError::ConfigurationInvalid(
                        "bounded-local cache requires CACHE_MAX_SIZE to be set".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        let cache = CacheSettings {
            kind,
            max_size,
            ttl: parse_strict::<u64>(&lookup, "CACHE_TTL_MS")?.map(Duration::from_millis),
            max_idle: parse_strict::<u64>(&lookup, "CACHE_MAX_IDLE_MS")?
                .map(Duration::from_millis),
        };

        Ok(Self {
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            catalog_size: lookup("CATALOG_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.catalog_size),
            cleanup_interval: lookup("CLEANUP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            cache,
        })
    }
}

fn parse_strict<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            AppError::ConfigurationInvalid(format!("{} has an invalid value '{}'", key, raw))
        }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            catalog_size: 5000,
            cleanup_interval: 1,
            cache: CacheSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.catalog_size, 5000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.cache, CacheSettings::bounded_local(1000));
    }

    #[test]
    fn test_config_from_empty_source_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache.kind, BackendKind::BoundedLocal);
        assert_eq!(config.cache.max_size, Some(DEFAULT_LOCAL_MAX_SIZE));
    }

    #[test]
    fn test_config_explicit_bounded_local_requires_max_size() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_BACKEND", "bounded-local")]));
        assert!(
            matches!(result, Err(AppError::ConfigurationInvalid(msg)) if msg.contains("CACHE_MAX_SIZE"))
        );
    }

    #[test]
    fn test_config_explicit_bounded_local_with_max_size() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_BACKEND", "bounded-local"),
            ("CACHE_MAX_SIZE", "25"),
        ]))
        .unwrap();
        assert_eq!(config.cache, CacheSettings::bounded_local(25));
    }

    #[test]
    fn test_config_unbounded_local_needs_no_size() {
        let config =
            Config::from_lookup(lookup_from(&[("CACHE_BACKEND", "unbounded-local")])).unwrap();
        assert_eq!(config.cache, CacheSettings::unbounded_local());
    }

    #[test]
    fn test_config_distributed_ttl() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_BACKEND", "distributed-ttl"),
            ("CACHE_TTL_MS", "60000"),
            ("CACHE_MAX_IDLE_MS", "30000"),
            ("CACHE_MAX_SIZE", "500"),
        ]))
        .unwrap();

        assert_eq!(
            config.cache,
            CacheSettings::distributed_ttl(
                Duration::from_secs(60),
                Duration::from_secs(30),
                500
            )
        );
    }

    #[test]
    fn test_config_unknown_backend_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_BACKEND", "memcached")]));
        assert!(matches!(result, Err(AppError::ConfigurationInvalid(_))));
    }

    #[test]
    fn test_config_malformed_cache_value_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_TTL_MS", "soon")]));
        assert!(matches!(result, Err(AppError::ConfigurationInvalid(_))));
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!(
            "Unbounded_Local".parse::<BackendKind>().unwrap(),
            BackendKind::UnboundedLocal
        );
        assert_eq!("disabled".parse::<BackendKind>().unwrap(), BackendKind::Disabled);
        assert_eq!(BackendKind::DistributedTtl.to_string(), "distributed-ttl");
    }
}
