use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candle. Timestamps are epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price used by VWAP: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Candle open time as a UTC datetime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Market the instrument trades in. Only affects price formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    #[default]
    Crypto,
    Forex,
}

impl MarketType {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crypto" => Some(Self::Crypto),
            "forex" | "fx" => Some(Self::Forex),
            _ => None,
        }
    }

    /// Decimal places used to display a price of this magnitude.
    pub fn price_decimals(&self, price: f64) -> usize {
        let magnitude = price.abs();
        match self {
            Self::Crypto => {
                if magnitude >= 1000.0 {
                    2
                } else if magnitude >= 1.0 {
                    4
                } else {
                    8
                }
            }
            // Metals and indices quote in cents, JPY crosses in thousandths, majors in pips.
            Self::Forex => {
                if magnitude >= 1000.0 {
                    2
                } else if magnitude >= 20.0 {
                    3
                } else {
                    5
                }
            }
        }
    }

    /// Format a price with the market's display convention.
    pub fn format_price(&self, price: f64) -> String {
        if !price.is_finite() {
            return "n/a".to_string();
        }
        format!("{:.*}", self.price_decimals(price), price)
    }
}
