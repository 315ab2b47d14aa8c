use std::{env, fmt, num::NonZeroUsize, str::FromStr, time::Duration};

use clap::ValueEnum;
use thiserror::Error;

const DEFAULT_CACHE_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Errors produced while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown {kind} backend '{value}'")]
    UnknownBackend { kind: &'static str, value: String },
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Durable store holding organisations and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Process-local maps, lost on exit.
    Inmemory,
    /// SQLite database file.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inmemory" | "in-memory" | "memory" => Ok(Self::Inmemory),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnknownBackend {
                kind: "storage",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inmemory => write!(f, "inmemory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Cache holding the organisation and user ID sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    /// In-process LRU cache.
    Memory,
    /// Shared Redis server.
    Redis,
    /// No caching; every existence check reaches the repository.
    None,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "none" | "null" | "off" => Ok(Self::None),
            _ => Err(ConfigError::UnknownBackend {
                kind: "cache",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage backend (default: sqlite)
    pub storage_backend: StorageBackend,
    /// Cache backend (default: memory)
    pub cache_backend: CacheBackend,
    /// Path to SQLite database file (default: "orgdir.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    pub redis_url: String,
    /// TTL applied to cached ID sets, in seconds (default: none)
    pub cache_keys_ttl_seconds: Option<u64>,
    /// Upper bound on every cache call, in milliseconds (default: 500)
    pub cache_timeout_ms: u64,
    /// Maximum number of memory cache entries (default: 10,000)
    pub cache_max_entries: NonZeroUsize,
    /// Shared secret for the `X-API-KEY` header (default: none, API open)
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_BACKEND` - `inmemory` or `sqlite` (default: sqlite)
    /// - `CACHE_BACKEND` - `memory`, `redis` or `none` (default: memory)
    /// - `SQLITE_PATH` - SQLite database path (default: "orgdir.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_KEYS_TTL_SECONDS` - ID set TTL, must be positive (default: none)
    /// - `CACHE_TIMEOUT_MS` - cache call timeout (default: 500)
    /// - `CACHE_MAX_ENTRIES` - memory cache capacity (default: 10,000)
    /// - `API_KEY` - enables API key authentication when set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Sqlite,
        };
        let cache_backend = match var("CACHE_BACKEND") {
            Some(value) => value.parse()?,
            None => CacheBackend::Memory,
        };

        let cache_keys_ttl_seconds = match var("CACHE_KEYS_TTL_SECONDS") {
            Some(value) => Some(parse_positive("CACHE_KEYS_TTL_SECONDS", &value)?),
            None => None,
        };
        let cache_timeout_ms = match var("CACHE_TIMEOUT_MS") {
            Some(value) => parse_positive("CACHE_TIMEOUT_MS", &value)?,
            None => 500,
        };
        let cache_max_entries = match var("CACHE_MAX_ENTRIES") {
            Some(value) => value
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "CACHE_MAX_ENTRIES",
                    value,
                    reason: "expected a positive integer",
                })?,
            None => DEFAULT_CACHE_MAX_ENTRIES,
        };

        Ok(Self {
            storage_backend,
            cache_backend,
            sqlite_path: var("SQLITE_PATH").unwrap_or_else(|| "orgdir.db".to_string()),
            redis_url: var("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_keys_ttl_seconds,
            cache_timeout_ms,
            cache_max_entries,
            api_key: var("API_KEY"),
        })
    }

    /// Get the ID set TTL as a Duration, if one is configured.
    pub fn cache_keys_ttl(&self) -> Option<Duration> {
        self.cache_keys_ttl_seconds.map(Duration::from_secs)
    }

    /// Get the cache call timeout as a Duration.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected a positive integer",
        }),
    }
}
