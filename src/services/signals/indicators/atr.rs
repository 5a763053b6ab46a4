//! Average True Range (ATR) indicator.

use super::Indicator;
use crate::services::series::rolling_mean;
use crate::types::Candle;

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by averaging true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first bar has no previous close, so its TR is High-Low.
pub struct Atr {
    period: usize,
    name: String,
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ATR ({})", period),
        }
    }

    /// True range of `current` given the prior bar, if any.
    pub fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
        let hl = current.high - current.low;
        match previous {
            Some(prev) => {
                let hc = (current.high - prev.close).abs();
                let lc = (current.low - prev.close).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        }
    }

    /// True range for every bar.
    pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
        candles
            .iter()
            .enumerate()
            .map(|(i, c)| Self::true_range(c, i.checked_sub(1).map(|p| &candles[p])))
            .collect()
    }
}

impl Indicator for Atr {
    type Output = Vec<f64>;

    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> &str {
        &self.name
    }


    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        rolling_mean(&Self::true_ranges(candles), self.period)
    }
}
