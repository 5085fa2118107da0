use std::env;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::domain::order_number::MAX_PREFIX_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Runtime settings, read from the environment (and `.env` via dotenvy in `main`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    pub order_number_prefix: String,
    pub order_number_max_attempts: u32,
    pub shipping_fee: BigDecimal,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(var("PORT"), "PORT", 8080u16, "expected a port number")?;
        let db_pool_size = parse_or(var("DB_POOL_SIZE"), "DB_POOL_SIZE", 10u32, "expected a positive integer")?;
        if db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                value: "0".into(),
                reason: "expected a positive integer",
            });
        }
        let order_number_prefix = var("ORDER_NUMBER_PREFIX")
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| "ZD".to_string());
        if order_number_prefix.chars().count() > MAX_PREFIX_LEN {
            return Err(ConfigError::Invalid {
                name: "ORDER_NUMBER_PREFIX",
                value: order_number_prefix,
                reason: "must be at most 20 characters",
            });
        }
        let order_number_max_attempts = parse_or(
            var("ORDER_NUMBER_MAX_ATTEMPTS"),
            "ORDER_NUMBER_MAX_ATTEMPTS",
            5u32,
            "expected an integer of at least 1",
        )?;
        if order_number_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "ORDER_NUMBER_MAX_ATTEMPTS",
                value: "0".into(),
                reason: "expected an integer of at least 1",
            });
        }
        let shipping_fee = parse_or(
            var("SHIPPING_FEE"),
            "SHIPPING_FEE",
            BigDecimal::from(0),
            "expected a decimal amount",
        )?;
        if shipping_fee < BigDecimal::from(0) {
            return Err(ConfigError::Invalid {
                name: "SHIPPING_FEE",
                value: shipping_fee.to_string(),
                reason: "must not be negative",
            });
        }

        Ok(Settings {
            database_url,
            host,
            port,
            db_pool_size,
            order_number_prefix,
            order_number_max_attempts,
            shipping_fee,
        })
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
            reason,
        }),
        None => Ok(default),
    }
}
