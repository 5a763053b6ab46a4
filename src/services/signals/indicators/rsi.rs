//! Relative Strength Index (RSI) indicator.

use super::{closes, Indicator};
use crate::services::series::{diff, rolling_mean};
use crate::types::Candle;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses,
/// averaged with a simple rolling mean over `period` price changes.
/// Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
pub struct Rsi {
    period: usize,
    name: String,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("RSI ({})", period),
        }
    }

    /// RSI of an arbitrary series.
    pub fn over(&self, values: &[f64]) -> Vec<f64> {
        let deltas = diff(values);
        let gains: Vec<f64> = deltas.iter().map(|&d| non_nan(d, d.max(0.0))).collect();
        let losses: Vec<f64> = deltas.iter().map(|&d| non_nan(d, (-d).max(0.0))).collect();

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| rsi_from_averages(g, l))
            .collect()
    }
}

fn non_nan(source: f64, value: f64) -> f64 {
    if source.is_nan() {
        f64::NAN
    } else {
        value
    }
}

/// RSI from average gain and loss. No losses reads 100; no movement at all reads 50.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    let gain = avg_gain.max(0.0);
    let loss = avg_loss.max(0.0);

    if loss == 0.0 {
        return if gain == 0.0 { 50.0 } else { 100.0 };
    }

    let rs = gain / loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

impl Indicator for Rsi {
    type Output = Vec<f64>;

    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        &self.name
    }


    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        self.over(&closes(candles))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_rsi_id_and_name() {
        let rsi = Rsi::default();
        assert_eq!(rsi.id(), "rsi");
        assert_eq!(rsi.name(), "RSI (14)");
    }

    #[test]
    fn test_rsi_name_follows_period() {
        let rsi = Rsi::new(7);
        assert_eq!(rsi.name(), "RSI (7)");
        assert_eq!(rsi.min_periods(), 8);
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::default().calculate(&create_uptrend_candles(14));
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rsi_first_defined_bar() {
        let rsi = Rsi::default().calculate(&create_uptrend_candles(15));
        assert!(rsi[13].is_nan());
        assert!(rsi[14].is_finite());
    }

    #[test]
    fn test_rsi_uptrend_saturates() {
        let rsi = Rsi::default().calculate(&create_uptrend_candles(50));
        assert_eq!(rsi[49], 100.0);
    }

    #[test]
    fn test_rsi_downtrend_low_value() {
        let rsi = Rsi::default().calculate(&create_downtrend_candles(50));
        assert_eq!(rsi[49], 0.0);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let rsi = Rsi::default().calculate(&create_flat_candles(30));
        assert_eq!(rsi[29], 50.0);
    }

    #[test]
    fn test_rsi_known_value() {
        // Seven gains of 2 and seven losses of 1 over the window: RS = 2, RSI = 66.67.
        let mut values = vec![100.0];
        for i in 0..14 {
            let last = values[values.len() - 1];
            values.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let rsi = Rsi::default().over(&values);
        assert!((rsi[14] - 200.0 / 3.0).abs() < 1e-9, "got {}", rsi[14]);
    }

    #[test]
    fn test_rsi_value_range() {
        let rsi = Rsi::default().calculate(&create_choppy_candles(200));
        for v in rsi.iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(v), "RSI out of range: {}", v);
        }
    }
}
