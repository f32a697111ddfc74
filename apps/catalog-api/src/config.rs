//! Configuration for the Catalog API

use core_config::{
    AppInfo, FromEnv, app_info, env_or_default, env_parse_or_default, server::ServerConfig,
};
use database::mongodb::MongoConfig;
use database::redis::RedisConfig;
use domain_catalog::cache::{DEFAULT_CACHE_KEY, DEFAULT_CACHE_TTL_SECS};

pub use core_config::Environment;

/// Where the product collection comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceMode {
    /// Persistent MongoDB store, populated from upstream once when empty
    Database,
    /// Redis snapshot with a TTL, refreshed from upstream on expiry
    Cache,
}

impl SourceMode {
    fn from_env() -> eyre::Result<Self> {
        let raw = env_or_default("CATALOG_SOURCE", "database");
        match raw.to_lowercase().as_str() {
            "database" | "db" => Ok(SourceMode::Database),
            "cache" | "redis" => Ok(SourceMode::Cache),
            other => Err(eyre::eyre!(
                "Invalid CATALOG_SOURCE '{}', expected 'database' or 'cache'",
                other
            )),
        }
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Database => write!(f, "database"),
            SourceMode::Cache => write!(f, "cache"),
        }
    }
}

/// Catalog-specific settings
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub source: SourceMode,
    pub upstream_url: String,
    pub upstream_timeout_secs: u64,
    pub cache_key: String,
    pub cache_ttl_secs: u64,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub catalog: CatalogConfig,
    /// Present in database mode only
    pub mongodb: Option<MongoConfig>,
    /// Present in cache mode only
    pub redis: Option<RedisConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let source = SourceMode::from_env()?;

        let catalog = CatalogConfig {
            source: source.clone(),
            upstream_url: env_or_default("UPSTREAM_URL", "https://dummyjson.com/products"),
            upstream_timeout_secs: env_parse_or_default("UPSTREAM_TIMEOUT_SECS", 10)?,
            cache_key: env_or_default("CACHE_KEY", DEFAULT_CACHE_KEY),
            cache_ttl_secs: env_parse_or_default("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
        };

        let (mongodb, redis) = match source {
            SourceMode::Database => (Some(MongoConfig::from_env()?), None),
            SourceMode::Cache => (None, Some(RedisConfig::from_env()?)),
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            catalog,
            mongodb,
            redis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_mode_defaults_to_database() {
        temp_env::with_var_unset("CATALOG_SOURCE", || {
            assert_eq!(SourceMode::from_env().unwrap(), SourceMode::Database);
        });
    }

    #[test]
    fn test_source_mode_cache() {
        temp_env::with_var("CATALOG_SOURCE", Some("cache"), || {
            assert_eq!(SourceMode::from_env().unwrap(), SourceMode::Cache);
        });

        temp_env::with_var("CATALOG_SOURCE", Some("Redis"), || {
            assert_eq!(SourceMode::from_env().unwrap(), SourceMode::Cache);
        });
    }

    #[test]
    fn test_source_mode_rejects_unknown_values() {
        temp_env::with_var("CATALOG_SOURCE", Some("filesystem"), || {
            assert!(SourceMode::from_env().is_err());
        });
    }

    #[test]
    fn test_config_database_mode_requires_mongo_vars() {
        temp_env::with_vars(
            [
                ("CATALOG_SOURCE", Some("database")),
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_config_cache_mode_reads_redis_and_ttl() {
        temp_env::with_vars(
            [
                ("CATALOG_SOURCE", Some("cache")),
                ("REDIS_URL", Some("redis://localhost:6379")),
                ("CACHE_TTL_SECS", Some("120")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.catalog.source, SourceMode::Cache);
                assert_eq!(config.catalog.cache_ttl_secs, 120);
                assert!(config.redis.is_some());
                assert!(config.mongodb.is_none());
            },
        );
    }

    #[test]
    fn test_config_catalog_defaults() {
        temp_env::with_vars(
            [
                ("CATALOG_SOURCE", Some("cache")),
                ("REDIS_URL", Some("redis://localhost:6379")),
                ("UPSTREAM_URL", None::<&str>),
                ("UPSTREAM_TIMEOUT_SECS", None),
                ("CACHE_KEY", None),
                ("CACHE_TTL_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.catalog.upstream_url, "https://dummyjson.com/products");
                assert_eq!(config.catalog.upstream_timeout_secs, 10);
                assert_eq!(config.catalog.cache_key, DEFAULT_CACHE_KEY);
                assert_eq!(config.catalog.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
            },
        );
    }
}
