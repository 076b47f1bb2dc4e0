use thiserror::Error;

pub const DEFAULT_CHANNEL_BUFFER: usize = 100;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const CHANNEL_BUFFER_VAR: &str = "MARKET_CHANNEL_BUFFER";
pub const LOG_FILTER_VAR: &str = "MARKET_LOG";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Startup settings for [`MarketSystem`](super::MarketSystem).
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Capacity of every service's request channel. Must be non-zero.
    pub channel_buffer: usize,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by `MARKET_CHANNEL_BUFFER` and `MARKET_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(CHANNEL_BUFFER_VAR) {
            let invalid = |reason: String| ConfigError::Invalid {
                key: CHANNEL_BUFFER_VAR,
                value: raw.clone(),
                reason,
            };
            let buffer: usize = raw.trim().parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
            if buffer == 0 {
                return Err(invalid("must be greater than zero".to_string()));
            }
            config.channel_buffer = buffer;
        }

        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        Ok(config)
    }
}
