// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::net::SocketAddr;

/// Backoffice configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HTTP listen address.
    pub http_addr: SocketAddr,
    /// Minimum number of pooled connections kept open.
    pub pool_min: u32,
    /// Maximum number of pooled connections.
    pub pool_max: u32,
    /// How long a caller may wait for a pooled connection, in seconds.
    pub pool_acquire_timeout_secs: u64,
    /// Allowed CORS origins; empty means same-origin / internal deployment.
    pub cors_allowed_origins: Vec<String>,
    /// Environment label reported by the health endpoint ("development",
    /// "staging", "production").
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DORMAN_DATABASE_URL` (or `DATABASE_URL`): PostgreSQL connection string
    ///
    /// Optional (with defaults):
    /// - `DORMAN_HTTP_PORT`: HTTP listen port (default: 8080)
    /// - `DORMAN_POOL_MIN`: minimum pooled connections (default: 2)
    /// - `DORMAN_POOL_MAX`: maximum pooled connections (default: 10)
    /// - `DORMAN_POOL_ACQUIRE_TIMEOUT_SECS`: pool lease wait bound (default: 60)
    /// - `DORMAN_CORS_ALLOWED_ORIGINS`: comma-separated origin allowlist
    /// - `DORMAN_ENV`: environment label (default: "development")
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DORMAN_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| ConfigError::Missing("DORMAN_DATABASE_URL or DATABASE_URL"))?;

        let http_port: u16 = std::env::var("DORMAN_HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DORMAN_HTTP_PORT", "must be a valid port number"))?;

        let pool_min: u32 = std::env::var("DORMAN_POOL_MIN")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DORMAN_POOL_MIN", "must be a non-negative integer"))?;

        let pool_max: u32 = std::env::var("DORMAN_POOL_MAX")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DORMAN_POOL_MAX", "must be a positive integer"))?;

        if pool_max == 0 || pool_min > pool_max {
            return Err(ConfigError::Invalid(
                "DORMAN_POOL_MIN/DORMAN_POOL_MAX",
                "pool_max must be positive and at least pool_min",
            ));
        }

        let pool_acquire_timeout_secs: u64 = std::env::var("DORMAN_POOL_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(
                    "DORMAN_POOL_ACQUIRE_TIMEOUT_SECS",
                    "must be a positive integer",
                )
            })?;

        let cors_allowed_origins = std::env::var("DORMAN_CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let environment =
            std::env::var("DORMAN_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            http_addr: SocketAddr::from(([0, 0, 0, 0], http_port)),
            pool_min,
            pool_max,
            pool_acquire_timeout_secs,
            cors_allowed_origins,
            environment,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set env vars for a test and restore them after
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.vars.drain(..).rev() {
                // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
                unsafe {
                    match value {
                        Some(v) => env::set_var(&key, v),
                        None => env::remove_var(&key),
                    }
                }
            }
        }
    }

    fn clear_optional(guard: &mut EnvGuard) {
        guard.remove("DORMAN_HTTP_PORT");
        guard.remove("DORMAN_POOL_MIN");
        guard.remove("DORMAN_POOL_MAX");
        guard.remove("DORMAN_POOL_ACQUIRE_TIMEOUT_SECS");
        guard.remove("DORMAN_CORS_ALLOWED_ORIGINS");
        guard.remove("DORMAN_ENV");
    }

    #[test]
    fn test_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("DORMAN_DATABASE_URL", "postgres://localhost/dorman");
        guard.remove("DATABASE_URL");
        clear_optional(&mut guard);

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://localhost/dorman");
        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.pool_min, 2);
        assert_eq!(config.pool_max, 10);
        assert_eq!(config.pool_acquire_timeout_secs, 60);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_config_database_url_fallback() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.remove("DORMAN_DATABASE_URL");
        guard.set("DATABASE_URL", "postgres://db:5432/edata");
        clear_optional(&mut guard);

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_url, "postgres://db:5432/edata");
    }

    #[test]
    fn test_config_missing_database_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.remove("DORMAN_DATABASE_URL");
        guard.remove("DATABASE_URL");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("DORMAN_DATABASE_URL"));
    }

    #[test]
    fn test_config_custom_pool_and_port() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("DORMAN_DATABASE_URL", "postgres://localhost/dorman");
        clear_optional(&mut guard);
        guard.set("DORMAN_HTTP_PORT", "9000");
        guard.set("DORMAN_POOL_MIN", "1");
        guard.set("DORMAN_POOL_MAX", "25");

        let config = Config::from_env().unwrap();
        assert_eq!(config.http_addr.port(), 9000);
        assert_eq!(config.pool_min, 1);
        assert_eq!(config.pool_max, 25);
    }

    #[test]
    fn test_config_invalid_port() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("DORMAN_DATABASE_URL", "postgres://localhost/dorman");
        clear_optional(&mut guard);
        guard.set("DORMAN_HTTP_PORT", "not_a_port");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("DORMAN_HTTP_PORT", _)));
    }

    #[test]
    fn test_config_rejects_min_above_max() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("DORMAN_DATABASE_URL", "postgres://localhost/dorman");
        clear_optional(&mut guard);
        guard.set("DORMAN_POOL_MIN", "20");
        guard.set("DORMAN_POOL_MAX", "5");

        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_config_cors_origins_parsed_and_trimmed() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("DORMAN_DATABASE_URL", "postgres://localhost/dorman");
        clear_optional(&mut guard);
        guard.set(
            "DORMAN_CORS_ALLOWED_ORIGINS",
            "https://bo.example.com, https://admin.example.com ,",
        );

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec![
                "https://bo.example.com".to_string(),
                "https://admin.example.com".to_string(),
            ]
        );
    }
}
