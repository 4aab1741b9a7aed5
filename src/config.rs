// src/config.rs
use std::net::IpAddr;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = match std::env::var("HOST") {
            Ok(h) => h.parse().with_context(|| format!("HOST is not an IP address: {h}"))?,
            Err(_) => IpAddr::from([127, 0, 0, 1]),
        };

        let port = parse_or("PORT", 3000)?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", 10)?;
        let run_migrations = parse_or("RUN_MIGRATIONS", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            run_migrations,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back() {
        assert_eq!(parse_or("INVENTORY_TEST_UNSET_PORT", 3000u16).unwrap(), 3000);
    }
}
