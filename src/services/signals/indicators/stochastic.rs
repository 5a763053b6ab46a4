//! Stochastic RSI indicator.

use super::{closes, Indicator, Rsi};
use crate::services::series::{rolling_max, rolling_mean, rolling_min};
use crate::types::Candle;

/// Stochastic RSI.
///
/// Applies the stochastic formula to RSI instead of price:
/// %K raw = (RSI - Lowest RSI) / (Highest RSI - Lowest RSI) * 100
/// %K = SMA(3) of raw, %D = SMA(3) of %K.
///
/// Signals:
/// - Below 20: Oversold (bullish)
/// - Above 80: Overbought (bearish)
pub struct StochasticRsi {
    rsi_period: usize,
    stoch_period: usize,
    smooth_k: usize,
    smooth_d: usize,
}

impl Default for StochasticRsi {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
            smooth_k: 3,
            smooth_d: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StochRsiSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticRsi {
    pub fn over(&self, values: &[f64]) -> StochRsiSeries {
        let rsi = Rsi::new(self.rsi_period).over(values);
        let lowest = rolling_min(&rsi, self.stoch_period);
        let highest = rolling_max(&rsi, self.stoch_period);

        let raw: Vec<f64> = rsi
            .iter()
            .zip(lowest.iter().zip(&highest))
            .map(|(&r, (&lo, &hi))| stochastic_position(r, lo, hi))
            .collect();

        let k = clamp_percent(rolling_mean(&raw, self.smooth_k));
        let d = clamp_percent(rolling_mean(&k, self.smooth_d));
        StochRsiSeries { k, d }
    }
}

fn clamp_percent(series: Vec<f64>) -> Vec<f64> {
    series.into_iter().map(|v| v.clamp(0.0, 100.0)).collect()
}

/// Position of `value` in `[low, high]` on a 0-100 scale. A flat range reads 50.
fn stochastic_position(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() || low.is_nan() || high.is_nan() {
        return f64::NAN;
    }
    let range = high - low;
    if range <= 0.0 {
        return 50.0;
    }
    ((value - low) / range * 100.0).clamp(0.0, 100.0)
}

impl Indicator for StochasticRsi {
    type Output = StochRsiSeries;

    fn id(&self) -> &str {
        "stoch_rsi"
    }

    fn name(&self) -> &str {
        "Stochastic RSI"
    }


    fn min_periods(&self) -> usize {
        self.rsi_period + self.stoch_period + self.smooth_k + self.smooth_d - 2
    }

    fn calculate(&self, candles: &[Candle]) -> StochRsiSeries {
        self.over(&closes(candles))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_stoch_rsi_id_and_name() {
        let stoch = StochasticRsi::default();
        assert_eq!(stoch.id(), "stoch_rsi");
        assert_eq!(stoch.name(), "Stochastic RSI");
    }

    #[test]
    fn test_stoch_rsi_min_periods() {
        assert_eq!(StochasticRsi::default().min_periods(), 32);
    }

    #[test]
    fn test_stoch_rsi_definition_boundaries() {
        let series = StochasticRsi::default().calculate(&create_choppy_candles(40));
        assert!(series.k[28].is_nan());
        assert!(series.k[29].is_finite());
        assert!(series.d[30].is_nan());
        assert!(series.d[31].is_finite());
    }

    #[test]
    fn test_stoch_rsi_constant_rsi_reads_midpoint() {
        // RSI pinned at 100 through a steady uptrend.
        let series = StochasticRsi::default().calculate(&create_uptrend_candles(60));
        assert_eq!(series.k[59], 50.0);
        assert_eq!(series.d[59], 50.0);
    }

    #[test]
    fn test_stoch_rsi_value_range() {
        let series = StochasticRsi::default().calculate(&create_choppy_candles(200));
        for v in series.k.iter().chain(&series.d).filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(v), "StochRSI out of range: {}", v);
        }
    }

    #[test]
    fn test_stochastic_position() {
        assert_eq!(stochastic_position(30.0, 20.0, 40.0), 50.0);
        assert_eq!(stochastic_position(40.0, 20.0, 40.0), 100.0);
        assert_eq!(stochastic_position(35.0, 35.0, 35.0), 50.0);
        assert!(stochastic_position(f64::NAN, 20.0, 40.0).is_nan());
    }
}
