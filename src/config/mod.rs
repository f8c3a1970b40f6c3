use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub session: SessionConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub seat_cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
}

// Fares shown on the seat page
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PricingConfig {
    pub adult_fare: u32,
    pub disabled_discount_percent: u32,
    pub child_discount_percent: u32,
    pub infant_seat_fare_percent: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            adult_fare: 25000,
            disabled_discount_percent: 50,
            child_discount_percent: 30,
            infant_seat_fare_percent: 25,
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or(ConfigError::Missing(key))
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pricing_defaults = PricingConfig::default();
        Ok(Config {
            app: AppConfig {
                host: or_default(&lookup, "HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT", 8000)?,
                environment: or_default(&lookup, "ENVIRONMENT", "development"),
                rust_log: or_default(
                    &lookup,
                    "RUST_LOG",
                    "seat_booking=debug,tower_http=debug",
                ),
                static_dir: or_default(&lookup, "STATIC_DIR", "static"),
            },
            database: DatabaseConfig {
                url: required(&lookup, "DATABASE_URL")?,
                pool_size: parsed(&lookup, "DB_POOL_SIZE", 10)?,
            },
            redis: RedisConfig {
                url: required(&lookup, "REDIS_URL")?,
                seat_cache_ttl_seconds: parsed(&lookup, "SEAT_CACHE_TTL_SECONDS", 60)?,
            },
            session: SessionConfig {
                ttl_seconds: parsed(&lookup, "SESSION_TTL_SECONDS", 86400)?,
            },
            pricing: PricingConfig {
                adult_fare: parsed(&lookup, "ADULT_FARE", pricing_defaults.adult_fare)?,
                disabled_discount_percent: parsed(
                    &lookup,
                    "DISABLED_DISCOUNT_PERCENT",
                    pricing_defaults.disabled_discount_percent,
                )?,
                child_discount_percent: parsed(
                    &lookup,
                    "CHILD_DISCOUNT_PERCENT",
                    pricing_defaults.child_discount_percent,
                )?,
                infant_seat_fare_percent: parsed(
                    &lookup,
                    "INFANT_SEAT_FARE_PERCENT",
                    pricing_defaults.infant_seat_fare_percent,
                )?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_urls_are_set() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/booking"),
            ("REDIS_URL", "redis://localhost"),
        ]))
        .unwrap();

        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.environment, "development");
        assert!(!config.app.is_production());
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.session.ttl_seconds, 86400);
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup(&[("REDIS_URL", "redis://localhost")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn malformed_port_is_reported_with_its_value() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/booking"),
            ("REDIS_URL", "redis://localhost"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn fare_overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/booking"),
            ("REDIS_URL", "redis://localhost"),
            ("ADULT_FARE", "30000"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(config.pricing.adult_fare, 30000);
        assert!(config.app.is_production());
    }
}
