//! Average Directional Index (ADX) indicator.

use super::{Atr, Indicator};
use crate::services::series::rolling_mean;
use crate::types::Candle;

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// Combined with +DI and -DI for direction. Directional movement, ATR and DX
/// are all averaged with a simple rolling mean over `period` bars.
pub struct Adx {
    period: usize,
    name: String,
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdxSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ADX ({})", period),
        }
    }

    /// +DM and -DM for every bar. The first bar has no prior bar and is undefined.
    fn directional_movement(candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
        let mut plus_dm = vec![f64::NAN; candles.len()];
        let mut minus_dm = vec![f64::NAN; candles.len()];

        for i in 1..candles.len() {
            let up_move = candles[i].high - candles[i - 1].high;
            let down_move = candles[i - 1].low - candles[i].low;

            plus_dm[i] = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            minus_dm[i] = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
        }

        (plus_dm, minus_dm)
    }

    fn directional_index(smoothed_dm: f64, atr: f64) -> f64 {
        if smoothed_dm.is_nan() || atr.is_nan() || atr <= 0.0 {
            return f64::NAN;
        }
        100.0 * smoothed_dm / atr
    }

    fn dx(plus_di: f64, minus_di: f64) -> f64 {
        if plus_di.is_nan() || minus_di.is_nan() {
            return f64::NAN;
        }
        let sum = plus_di + minus_di;
        if sum == 0.0 {
            return 0.0;
        }
        100.0 * (plus_di - minus_di).abs() / sum
    }
}

impl Indicator for Adx {
    type Output = AdxSeries;

    fn id(&self) -> &str {
        "adx"
    }

    fn name(&self) -> &str {
        &self.name
    }


    fn min_periods(&self) -> usize {
        self.period * 2
    }

    fn calculate(&self, candles: &[Candle]) -> AdxSeries {
        let atr = Atr::new(self.period).calculate(candles);
        let (plus_dm, minus_dm) = Self::directional_movement(candles);
        let smoothed_plus = rolling_mean(&plus_dm, self.period);
        let smoothed_minus = rolling_mean(&minus_dm, self.period);

        let plus_di: Vec<f64> = smoothed_plus
            .iter()
            .zip(&atr)
            .map(|(&dm, &tr)| Self::directional_index(dm, tr))
            .collect();
        let minus_di: Vec<f64> = smoothed_minus
            .iter()
            .zip(&atr)
            .map(|(&dm, &tr)| Self::directional_index(dm, tr))
            .collect();

        let dx: Vec<f64> = plus_di
            .iter()
            .zip(&minus_di)
            .map(|(&p, &m)| Self::dx(p, m))
            .collect();
        let adx = rolling_mean(&dx, self.period)
            .into_iter()
            .map(|v| v.clamp(0.0, 100.0))
            .collect();

        AdxSeries {
            adx,
            plus_di,
            minus_di,
        }
    }
}
