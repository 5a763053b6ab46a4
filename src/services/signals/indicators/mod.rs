//! Technical indicator implementations.
//!
//! Each indicator maps a candle history to one or more series aligned with the
//! input, with `NaN` marking bars that do not have enough history yet.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod fibonacci;
pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod vwap;

pub use adx::{Adx, AdxSeries};
pub use atr::Atr;
pub use bollinger::{BollingerBands, BollingerSeries};
pub use ema::Ema;
pub use fibonacci::Fibonacci;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use stochastic::{StochRsiSeries, StochasticRsi};
pub use vwap::Vwap;

use crate::services::series::defined_at;
use crate::types::{Candle, FibonacciLevels, IndicatorSnapshot};

/// Trait implemented by every indicator.
pub trait Indicator: Send + Sync {
    /// Series produced by the indicator.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Number of candles needed before the latest value is defined.
    fn min_periods(&self) -> usize;

    /// Calculate the full series from candle data.
    fn calculate(&self, candles: &[Candle]) -> Self::Output;
}

/// Closing prices of a candle slice.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Calculate one indicator, noting it in `warming_up` when the history is too short.
fn run<I: Indicator>(indicator: I, candles: &[Candle], warming_up: &mut Vec<String>) -> I::Output {
    if candles.len() < indicator.min_periods() {
        warming_up.push(indicator.name().to_string());
    }
    indicator.calculate(candles)
}

/// Every indicator series used by confluence scoring, computed once per history.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub closes: Vec<f64>,
    pub ema20: Vec<f64>,
    pub ema50: Vec<f64>,
    pub ema200: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
    pub stoch_rsi: StochRsiSeries,
    pub adx: AdxSeries,
    pub atr: Vec<f64>,
    pub vwap: Vec<f64>,
    pub fibonacci: Option<FibonacciLevels>,
    /// Indicators whose latest value needs more candles than were given.
    pub warming_up: Vec<String>,
}

impl IndicatorSet {
    /// Compute all indicators with their standard parameters.
    pub fn compute(candles: &[Candle]) -> Self {
        let mut warming_up = Vec::new();
        Self {
            closes: closes(candles),
            ema20: run(Ema::new(20), candles, &mut warming_up),
            ema50: run(Ema::new(50), candles, &mut warming_up),
            ema200: run(Ema::new(200), candles, &mut warming_up),
            rsi: run(Rsi::default(), candles, &mut warming_up),
            macd: run(Macd::default(), candles, &mut warming_up),
            bollinger: run(BollingerBands::default(), candles, &mut warming_up),
            stoch_rsi: run(StochasticRsi::default(), candles, &mut warming_up),
            adx: run(Adx::default(), candles, &mut warming_up),
            atr: run(Atr::default(), candles, &mut warming_up),
            vwap: run(Vwap, candles, &mut warming_up),
            fibonacci: run(Fibonacci, candles, &mut warming_up),
            warming_up,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Indicator values at bar `index`. Out-of-range indices give an empty snapshot.
    pub fn snapshot_at(&self, index: usize) -> IndicatorSnapshot {
        let at = |series: &[f64]| defined_at(series, index);
        IndicatorSnapshot {
            price: at(&self.closes),
            ema20: at(&self.ema20),
            ema50: at(&self.ema50),
            ema200: at(&self.ema200),
            rsi: at(&self.rsi),
            macd: at(&self.macd.line),
            macd_signal: at(&self.macd.signal),
            macd_histogram: at(&self.macd.histogram),
            bb_upper: at(&self.bollinger.upper),
            bb_middle: at(&self.bollinger.middle),
            bb_lower: at(&self.bollinger.lower),
            stoch_rsi_k: at(&self.stoch_rsi.k),
            stoch_rsi_d: at(&self.stoch_rsi.d),
            adx: at(&self.adx.adx),
            plus_di: at(&self.adx.plus_di),
            minus_di: at(&self.adx.minus_di),
            atr: at(&self.atr),
            vwap: at(&self.vwap),
        }
    }

    /// Snapshot at the latest bar.
    pub fn latest(&self) -> IndicatorSnapshot {
        match self.len().checked_sub(1) {
            Some(last) => self.snapshot_at(last),
            None => IndicatorSnapshot::default(),
        }
    }

    /// Snapshot one bar before the latest.
    pub fn previous(&self) -> IndicatorSnapshot {
        match self.len().checked_sub(2) {
            Some(prev) => self.snapshot_at(prev),
            None => IndicatorSnapshot::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::Candle;

    pub fn create_uptrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle::new(
                    1_700_000_000 + i as i64 * 3600,
                    close - 0.5,
                    close + 0.5,
                    close - 0.5,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    pub fn create_downtrend_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let close = 400.0 - i as f64;
                Candle::new(
                    1_700_000_000 + i as i64 * 3600,
                    close + 0.5,
                    close + 0.5,
                    close - 0.5,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    pub fn create_flat_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| Candle::new(1_700_000_000 + i as i64 * 3600, 100.0, 100.0, 100.0, 100.0, 1000.0))
            .collect()
    }

    /// Deterministic zig-zag around a rising base.
    pub fn create_choppy_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let swing = if i % 2 == 0 { 1.5 } else { -1.2 };
                let close = 100.0 + i as f64 * 0.1 + swing + ((i % 7) as f64 - 3.0) * 0.4;
                Candle::new(
                    1_700_000_000 + i as i64 * 3600,
                    close - swing * 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    800.0 + (i % 5) as f64 * 100.0,
                )
            })
            .collect()
    }
}
