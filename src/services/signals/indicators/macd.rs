//! MACD (Moving Average Convergence Divergence) indicator.

use super::{closes, Ema, Indicator};
use crate::types::Candle;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// Buy signal: MACD crosses above signal line
/// Sell signal: MACD crosses below signal line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD line, signal line and histogram, aligned with the input candles.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    pub fn over(&self, values: &[f64]) -> MacdSeries {
        let fast = Ema::new(self.fast_period).over(values);
        let slow = Ema::new(self.slow_period).over(values);

        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = Ema::new(self.signal_period).over(&line);
        let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }


    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, candles: &[Candle]) -> MacdSeries {
        self.over(&closes(candles))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_macd_id_and_name() {
        let macd = Macd::default();
        assert_eq!(macd.id(), "macd");
        assert_eq!(macd.name(), "MACD");
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_definition_boundaries() {
        let series = Macd::default().calculate(&create_uptrend_candles(40));
        assert!(series.line[24].is_nan());
        assert!(series.line[25].is_finite());
        assert!(series.signal[32].is_nan());
        assert!(series.signal[33].is_finite());
        assert!(series.histogram[32].is_nan());
        assert!(series.histogram[33].is_finite());
    }

    #[test]
    fn test_macd_insufficient_data() {
        let series = Macd::default().calculate(&create_uptrend_candles(30));
        assert!(series.signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_macd_histogram_identity() {
        let series = Macd::default().calculate(&create_choppy_candles(120));
        for i in 0..120 {
            let (m, s, h) = (series.line[i], series.signal[i], series.histogram[i]);
            if h.is_finite() {
                assert!((h - (m - s)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let series = Macd::default().calculate(&create_uptrend_candles(100));
        assert!(series.line[99] > 0.0);
        assert!(series.line[99] > series.signal[99]);
    }

    #[test]
    fn test_macd_downtrend_negative() {
        let series = Macd::default().calculate(&create_downtrend_candles(100));
        assert!(series.line[99] < 0.0);
    }

    #[test]
    fn test_macd_custom_periods() {
        let series = Macd::new(3, 6, 3).over(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert!(series.line[5].is_finite());
        assert!(series.signal[7].is_finite());
        assert!(series.signal[6].is_nan());
    }
}
