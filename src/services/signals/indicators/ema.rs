//! Exponential Moving Average (EMA) indicator.

use super::{closes, Indicator};
use crate::types::Candle;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Smoothing factor is
/// `2 / (period + 1)`, seeded with the first defined value. The first
/// `period - 1` values are reported as undefined.
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("EMA ({})", period),
        }
    }

    /// EMA of an arbitrary series. Undefined inputs are skipped without resetting state.
    pub fn over(&self, values: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; values.len()];
        if self.period == 0 {
            return out;
        }

        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut ema: Option<f64> = None;
        let mut seen = 0usize;

        for (i, &value) in values.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            let next = match ema {
                None => value,
                Some(prev) => prev + alpha * (value - prev),
            };
            ema = Some(next);
            seen += 1;
            if seen >= self.period {
                out[i] = next;
            }
        }

        out
    }
}

impl Indicator for Ema {
    type Output = Vec<f64>;

    fn id(&self) -> &str {
        "ema"
    }

    fn name(&self) -> &str {
        &self.name
    }


    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        self.over(&closes(candles))
    }
}
