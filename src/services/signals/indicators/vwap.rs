//! Volume Weighted Average Price (VWAP) indicator.

use super::Indicator;
use crate::types::Candle;

/// VWAP (Volume Weighted Average Price) indicator.
///
/// Cumulative from the first candle of the history:
/// VWAP = Cumulative(TP * Volume) / Cumulative(Volume), TP = (High + Low + Close) / 3
///
/// Undefined while no volume has traded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Vwap;

impl Indicator for Vwap {
    type Output = Vec<f64>;

    fn id(&self) -> &str {
        "vwap"
    }

    fn name(&self) -> &str {
        "VWAP"
    }


    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        let mut cum_tp_vol = 0.0;
        let mut cum_vol = 0.0;

        candles
            .iter()
            .map(|candle| {
                cum_tp_vol += candle.typical_price() * candle.volume;
                cum_vol += candle.volume;
                if cum_vol > 0.0 {
                    cum_tp_vol / cum_vol
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_vwap_id_and_name() {
        assert_eq!(Vwap.id(), "vwap");
        assert_eq!(Vwap.name(), "VWAP");
        assert_eq!(Vwap.min_periods(), 1);
    }

    #[test]
    fn test_vwap_weighted_by_volume() {
        let candles = vec![
            Candle::new(0, 10.0, 10.0, 10.0, 10.0, 1.0),
            Candle::new(1, 20.0, 20.0, 20.0, 20.0, 3.0),
        ];
        let vwap = Vwap.calculate(&candles);
        assert_eq!(vwap[0], 10.0);
        assert_eq!(vwap[1], 17.5);
    }

    #[test]
    fn test_vwap_zero_volume_undefined() {
        let candles = vec![
            Candle::new(0, 10.0, 10.0, 10.0, 10.0, 0.0),
            Candle::new(1, 12.0, 12.0, 12.0, 12.0, 2.0),
        ];
        let vwap = Vwap.calculate(&candles);
        assert!(vwap[0].is_nan());
        assert_eq!(vwap[1], 12.0);
    }

    #[test]
    fn test_vwap_within_price_range() {
        let candles = create_choppy_candles(100);
        let vwap = Vwap.calculate(&candles);
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        assert!(vwap[99] > low && vwap[99] < high);
    }
}
