use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use quotes_storage_sqlite::PoolSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub pool: PoolSettings,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, applying defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("QUOTES_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid QUOTES_LISTEN_ADDR")?;
        let database_url = var("DATABASE_URL", "./db/quotes.db");
        let log_level = var("QUOTES_LOG_LEVEL", "info");
        let log_format = match var("QUOTES_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => return Err(anyhow!("Invalid QUOTES_LOG_FORMAT: {}", other)),
        };

        let max_open: u32 = parse(&var, "QUOTES_DB_MAX_OPEN_CONNS", "25")?;
        let max_idle: u32 = parse(&var, "QUOTES_DB_MAX_IDLE_CONNS", "5")?;
        let max_lifetime_secs: u64 = parse(&var, "QUOTES_DB_CONN_MAX_LIFETIME_SECS", "300")?;
        let max_idle_time_secs: u64 = parse(&var, "QUOTES_DB_CONN_MAX_IDLE_TIME_SECS", "60")?;
        if max_open == 0 {
            return Err(anyhow!("QUOTES_DB_MAX_OPEN_CONNS must be at least 1"));
        }

        let timeout_ms: u64 = parse(&var, "QUOTES_REQUEST_TIMEOUT_MS", "30000")?;
        let cors_allow = var("QUOTES_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            database_url,
            log_level,
            log_format,
            pool: PoolSettings {
                max_open,
                max_idle,
                max_lifetime: non_zero_secs(max_lifetime_secs),
                max_idle_time: non_zero_secs(max_idle_time_secs),
                ..PoolSettings::default()
            },
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse<T, V>(var: &V, key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str, &str) -> String,
{
    var(key, default)
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}", key))
}

/// Zero disables the limit.
fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then_some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.database_url, "./db/quotes.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.pool, PoolSettings::default());
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("QUOTES_LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "/tmp/q.db"),
            ("QUOTES_LOG_FORMAT", "JSON"),
            ("QUOTES_DB_MAX_OPEN_CONNS", "4"),
            ("QUOTES_DB_MAX_IDLE_CONNS", "2"),
            ("QUOTES_DB_CONN_MAX_LIFETIME_SECS", "0"),
            ("QUOTES_CORS_ALLOW_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_url, "/tmp/q.db");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.pool.max_open, 4);
        assert_eq!(config.pool.max_idle, 2);
        assert_eq!(config.pool.max_lifetime, None);
        assert_eq!(config.pool.max_idle_time, Some(Duration::from_secs(60)));
        assert_eq!(config.cors_allow.len(), 2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("QUOTES_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("QUOTES_DB_MAX_OPEN_CONNS", "many")]).is_err());
        assert!(config_from(&[("QUOTES_DB_MAX_OPEN_CONNS", "0")]).is_err());
        assert!(config_from(&[("QUOTES_LOG_FORMAT", "xml")]).is_err());
        assert!(config_from(&[("QUOTES_REQUEST_TIMEOUT_MS", "-1")]).is_err());
    }
}
