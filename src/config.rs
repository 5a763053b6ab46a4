use std::env;

use crate::error::{AppError, Result};
use crate::types::{MarketType, Timeframe};

/// Engine and CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bars compared against the latest bar when looking for divergences.
    pub divergence_lookback: usize,
    /// Timeframe used when a request does not name one.
    pub default_timeframe: Timeframe,
    /// Market used for price formatting when a request does not name one.
    pub market_type: MarketType,
    /// Histories shorter than this are scored but logged as under-warmed.
    pub min_candles: usize,
    /// Maximum analyses running at once in a batch.
    pub scoring_concurrency: usize,
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            divergence_lookback: 10,
            default_timeframe: Timeframe::OneHour,
            market_type: MarketType::Crypto,
            min_candles: 200,
            scoring_concurrency: 4,
            pretty_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Missing or unparseable values use defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            divergence_lookback: get("DIVERGENCE_LOOKBACK")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.divergence_lookback),
            default_timeframe: get("DEFAULT_TIMEFRAME")
                .and_then(|v| Timeframe::from_str(v.trim()))
                .unwrap_or(defaults.default_timeframe),
            market_type: get("MARKET_TYPE")
                .and_then(|v| MarketType::from_str(v.trim()))
                .unwrap_or(defaults.market_type),
            min_candles: get("MIN_CANDLES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_candles),
            scoring_concurrency: get("SCORING_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.scoring_concurrency),
            pretty_json: get("PRETTY_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.pretty_json),
        }
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.divergence_lookback == 0 {
            return Err(AppError::Config(
                "DIVERGENCE_LOOKBACK must be at least 1".to_string(),
            ));
        }
        if self.scoring_concurrency == 0 {
            return Err(AppError::Config(
                "SCORING_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
