#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

/// Redis database configuration
///
/// Holds Redis connection settings. It can be constructed manually or loaded
/// from environment variables (with the `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::redis::RedisConfig;
///
/// // Manual construction
/// let config = RedisConfig::new("redis://127.0.0.1:6379");
///
/// // From environment variables (requires `config` feature)
/// let config = RedisConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct RedisConfig {
    /// Redis connection URL (required)
    pub url: String,

    /// Optional database number (0-15 for default Redis)
    pub database: Option<u8>,

    /// Optional password for authentication
    pub password: Option<String>,
}

impl RedisConfig {
    /// Create a new RedisConfig with just a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
            password: None,
        }
    }

    /// Create a RedisConfig with a specific database number
    pub fn with_database(url: impl Into<String>, database: u8) -> Self {
        Self {
            database: Some(database),
            ..Self::new(url)
        }
    }

    /// Get a reference to the Redis URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("redis://127.0.0.1:6379")
    }
}

/// Load RedisConfig from environment variables
///
/// Environment variables:
/// - `REDIS_URL` or `REDIS_HOST` (required) - Redis connection string
/// - `REDIS_DATABASE` (optional) - Redis database number (0-15)
/// - `REDIS_PASSWORD` (optional) - Password for authentication
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Try REDIS_URL first, fall back to REDIS_HOST (for compatibility)
        let url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))?;

        let database = if let Ok(db_str) = std::env::var("REDIS_DATABASE") {
            Some(db_str.parse().map_err(|e| ConfigError::ParseError {
                key: "REDIS_DATABASE".to_string(),
                details: format!("{}", e),
            })?)
        } else {
            None
        };

        let password = std::env::var("REDIS_PASSWORD").ok();

        Ok(Self {
            url,
            database,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_new() {
        let config = RedisConfig::new("redis://localhost:6379");
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.database, None);
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_redis_config_with_database() {
        let config = RedisConfig::with_database("redis://localhost:6379", 2);
        assert_eq!(config.database, Some(2));
    }

    #[test]
    fn test_redis_config_default() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_from_env_with_redis_url() {
        temp_env::with_var("REDIS_URL", Some("redis://localhost:6379"), || {
            let config = RedisConfig::from_env().unwrap();
            assert_eq!(config.url, "redis://localhost:6379");
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_from_env_with_redis_host() {
        temp_env::with_vars(
            [
                ("REDIS_URL", None::<&str>),
                ("REDIS_HOST", Some("redis://prod:6379")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://prod:6379");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_from_env_missing() {
        temp_env::with_vars(
            [("REDIS_URL", None::<&str>), ("REDIS_HOST", None::<&str>)],
            || {
                let config = RedisConfig::from_env();
                assert!(config.is_err());
                assert!(config.unwrap_err().to_string().contains("REDIS"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_from_env_invalid_database() {
        temp_env::with_vars(
            [
                ("REDIS_URL", Some("redis://localhost:6379")),
                ("REDIS_DATABASE", Some("invalid")),
            ],
            || {
                let config = RedisConfig::from_env();
                assert!(config.is_err());
                assert!(config.unwrap_err().to_string().contains("REDIS_DATABASE"));
            },
        );
    }
}
