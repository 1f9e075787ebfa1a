use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

/// Where current prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Yahoo,
    /// No live prices; every position is valued at 0.
    None,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub timezone: String,
    /// 0 disables the background snapshot job.
    pub snapshot_interval: Duration,
    pub price_source: PriceSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/portfolio.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            timezone: "Asia/Taipei".to_string(),
            snapshot_interval: Duration::from_secs(3600),
            price_source: PriceSource::Yahoo,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LF_LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid LF_LISTEN_ADDR: {}", raw))?,
            Err(_) => defaults.listen_addr,
        };
        let db_path = std::env::var("LF_DB_PATH").unwrap_or(defaults.db_path);
        let cors_allow = std::env::var("LF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("LF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let timezone = std::env::var("LF_TIMEZONE").unwrap_or(defaults.timezone);
        let interval_secs: u64 = std::env::var("LF_SNAPSHOT_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .unwrap_or(3600);
        let price_source = match std::env::var("LF_PRICE_SOURCE") {
            Ok(raw) => parse_price_source(&raw)?,
            Err(_) => defaults.price_source,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            timezone,
            snapshot_interval: Duration::from_secs(interval_secs),
            price_source,
        })
    }
}

fn parse_price_source(raw: &str) -> anyhow::Result<PriceSource> {
    match raw.trim().to_lowercase().as_str() {
        "yahoo" => Ok(PriceSource::Yahoo),
        "none" => Ok(PriceSource::None),
        other => anyhow::bail!("Invalid LF_PRICE_SOURCE: {} (expected yahoo or none)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_source_parsing() {
        assert_eq!(parse_price_source("Yahoo").unwrap(), PriceSource::Yahoo);
        assert_eq!(parse_price_source(" none ").unwrap(), PriceSource::None);
        assert!(parse_price_source("bloomberg").is_err());
    }
}
