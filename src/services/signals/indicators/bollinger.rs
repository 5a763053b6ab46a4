//! Bollinger Bands indicator.

use super::{closes, Indicator};
use crate::services::series::{rolling_mean, rolling_std};
use crate::types::Candle;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// The deviation is the sample (n - 1) standard deviation of closes.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn over(&self, values: &[f64]) -> BollingerSeries {
        let middle = rolling_mean(values, self.period);
        let std = rolling_std(values, self.period);

        let upper = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m + self.std_dev_multiplier * s)
            .collect();
        let lower = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m - self.std_dev_multiplier * s)
            .collect();

        BollingerSeries {
            upper,
            middle,
            lower,
        }
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerSeries;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }


    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> BollingerSeries {
        self.over(&closes(candles))
    }
}
