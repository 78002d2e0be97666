use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use chrono_tz::Tz;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
const DEFAULT_DB_PATH: &str = "./db/fundpilot.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process configuration read from `FP_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// `text` or `json`
    pub log_format: String,
    pub market_timezone: Tz,
    pub history_base_url: Option<String>,
    pub realtime_base_url: Option<String>,
    pub request_timeout: Duration,
    /// Empty allows any origin
    pub cors_allow_origins: Vec<String>,
}

impl Config {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = env_or("FP_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("FP_LISTEN_ADDR is not a socket address")?;

        let market_timezone = match env_opt("FP_MARKET_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("FP_MARKET_TIMEZONE is invalid: {}", e))?,
            None => fundpilot_core::utils::time_utils::DEFAULT_MARKET_TZ,
        };

        let timeout_secs = match env_opt("FP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("FP_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let cors_allow_origins = env_opt("FP_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && s != "*")
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            listen_addr,
            db_path: env_or("FP_DB_PATH", DEFAULT_DB_PATH),
            log_format: env_or("FP_LOG_FORMAT", "text"),
            market_timezone,
            history_base_url: env_opt("FP_HISTORY_BASE_URL"),
            realtime_base_url: env_opt("FP_REALTIME_BASE_URL"),
            request_timeout: Duration::from_secs(timeout_secs),
            cors_allow_origins,
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}
