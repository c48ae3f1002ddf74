use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use shared::constants::HISTORY_LIMIT;
use shared::shared_wheel_game::{PrizeCatalog, WheelConfig};
use validator::Validate;

use crate::error::Error;

#[derive(Debug, Clone, Validate)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub redis_url: Option<String>,
    pub webhook_url: Option<String>,
    /// Announce every spin on the webhook instead of only rare prizes.
    pub announce_all: bool,
    #[validate(range(min = 1, max = 1000))]
    pub history_limit: usize,
    pub catalog: PrizeCatalog,
    pub wheel: WheelConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            redis_url: None,
            webhook_url: None,
            announce_all: false,
            history_limit: HISTORY_LIMIT,
            catalog: PrizeCatalog::default_catalog(),
            wheel: WheelConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, Error> {
        let mut config = ServerConfig::default();

        if let Some(addr) = parse_var::<SocketAddr>("WHEEL_BIND_ADDR")? {
            config.bind_addr = addr;
        }
        config.redis_url = non_empty_var("REDIS_URL");
        config.webhook_url = non_empty_var("WHEEL_WEBHOOK_URL");
        if let Some(announce_all) = parse_var::<bool>("WHEEL_ANNOUNCE_ALL")? {
            config.announce_all = announce_all;
        }
        if let Some(limit) = parse_var::<usize>("WHEEL_HISTORY_LIMIT")? {
            config.history_limit = limit;
        }

        if let Some(path) = non_empty_var("WHEEL_CATALOG_PATH") {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("reading {}: {}", path, e)))?;
            config.catalog = serde_json::from_str(&raw)
                .map_err(|e| Error::Config(format!("parsing {}: {}", path, e)))?;
        }

        if let Some(seconds) = parse_var::<u64>("WHEEL_COOLDOWN_SECONDS")? {
            config.wheel.cooldown_ms = seconds.saturating_mul(1000);
        }
        if let Some(threshold) = parse_var::<u32>("WHEEL_ULTRA_RARE_THRESHOLD")? {
            config.wheel.ultra_rare_threshold = threshold;
        }
        if let Some(ids) = non_empty_var("WHEEL_ULTRA_RARE_IDS") {
            config.wheel.ultra_rare_ids = ids
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
        }
        if let Some(revolutions) = parse_var::<u32>("WHEEL_MIN_REVOLUTIONS")? {
            config.wheel.min_full_revolutions = revolutions;
        }
        if let Some(jitter) = parse_var::<f64>("WHEEL_JITTER_FRACTION")? {
            config.wheel.jitter_fraction = jitter;
        }

        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<(), Error> {
        self.validate().map_err(|e| Error::Config(e.to_string()))?;
        self.wheel
            .check(&self.catalog)
            .map_err(|e| Error::Config(e.to_string()))?;

        // Fewer records than the threshold could never unlock ultra-rare prizes.
        if self.history_limit < self.wheel.ultra_rare_threshold as usize {
            return Err(Error::Config(format!(
                "WHEEL_HISTORY_LIMIT ({}) must be at least the ultra-rare threshold ({})",
                self.history_limit, self.wheel.ultra_rare_threshold
            )));
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, Error>
where
    T::Err: std::fmt::Display,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={}: {}", key, raw, e))),
        None => Ok(None),
    }
}
