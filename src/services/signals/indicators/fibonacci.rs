//! Fibonacci retracement levels.

use super::Indicator;
use crate::types::{Candle, FibLevel, FibonacciLevels};

/// Retracement ratios, measured down from the high.
pub const FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// Fibonacci retracement between the highest high and lowest low of the whole history.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fibonacci;

impl Fibonacci {
    /// Levels for an explicit swing. Endpoints are exactly `high` and `low`.
    pub fn levels(high: f64, low: f64) -> FibonacciLevels {
        let range = high - low;
        let levels = FIB_RATIOS
            .iter()
            .map(|&ratio| {
                let price = if ratio == 0.0 {
                    high
                } else if ratio == 1.0 {
                    low
                } else {
                    high - ratio * range
                };
                FibLevel {
                    ratio,
                    label: format!("{:.1}%", ratio * 100.0),
                    price,
                }
            })
            .collect();

        FibonacciLevels { high, low, levels }
    }
}

impl Indicator for Fibonacci {
    type Output = Option<FibonacciLevels>;

    fn id(&self) -> &str {
        "fibonacci"
    }

    fn name(&self) -> &str {
        "Fibonacci Retracement"
    }


    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, candles: &[Candle]) -> Option<FibonacciLevels> {
        let high = candles
            .iter()
            .map(|c| c.high)
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        let low = candles
            .iter()
            .map(|c| c.low)
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, f64::min);

        if !high.is_finite() || !low.is_finite() {
            return None;
        }
        Some(Self::levels(high, low))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_fibonacci_id_and_name() {
        assert_eq!(Fibonacci.id(), "fibonacci");
        assert_eq!(Fibonacci.name(), "Fibonacci Retracement");
    }

    #[test]
    fn test_fibonacci_empty() {
        assert!(Fibonacci.calculate(&[]).is_none());
    }

    #[test]
    fn test_fibonacci_levels() {
        let fib = Fibonacci::levels(200.0, 100.0);
        assert_eq!(fib.levels.len(), 7);
        assert_eq!(fib.level(0.0), Some(200.0));
        assert_eq!(fib.level(1.0), Some(100.0));
        assert!((fib.level(0.5).unwrap() - 150.0).abs() < 1e-9);
        assert!((fib.level(0.618).unwrap() - 138.2).abs() < 1e-9);
    }

    #[test]
    fn test_fibonacci_labels() {
        let fib = Fibonacci::levels(2.0, 1.0);
        let labels: Vec<&str> = fib.levels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["0.0%", "23.6%", "38.2%", "50.0%", "61.8%", "78.6%", "100.0%"]
        );
    }

    #[test]
    fn test_fibonacci_monotonic_over_history() {
        let candles = create_choppy_candles(150);
        let fib = Fibonacci.calculate(&candles).unwrap();
        assert!(fib.high >= fib.low);
        for pair in fib.levels.windows(2) {
            assert!(pair[0].price >= pair[1].price);
        }
        assert_eq!(fib.levels[0].price, fib.high);
        assert_eq!(fib.levels[6].price, fib.low);
    }

    #[test]
    fn test_fibonacci_flat_collapses() {
        let fib = Fibonacci.calculate(&create_flat_candles(10)).unwrap();
        assert!(fib.levels.iter().all(|l| l.price == 100.0));
    }
}
