//! Price/oscillator divergence at the latest bar.

use crate::types::Divergence;

/// Default number of bars compared against the latest one.
pub const DEFAULT_LOOKBACK: usize = 10;

/// Price tolerance when checking for a new extreme.
const EXTREME_TOLERANCE: f64 = 0.01;

/// Classify the last bar of `price` against `oscillator`.
///
/// The comparison window is the `lookback` bars strictly before the last bar.
/// Bullish when price is at (or within 1% of) the window low while the oscillator
/// sits above its reading at that low; bearish is the mirror image at the high.
/// Any undefined value involved in the comparison yields [`Divergence::None`].
pub fn detect(price: &[f64], oscillator: &[f64], lookback: usize) -> Divergence {
    let len = price.len().min(oscillator.len());
    if lookback == 0 || len == 0 {
        return Divergence::None;
    }
    let i = len - 1;
    if i < lookback {
        return Divergence::None;
    }

    let window = (i - lookback)..i;
    let (Some(low_idx), Some(high_idx)) = (
        extreme_index(price, window.clone(), |a, b| a < b),
        extreme_index(price, window, |a, b| a > b),
    ) else {
        return Divergence::None;
    };

    let (p, o) = (price[i], oscillator[i]);

    // NaN comparisons are false, so undefined oscillator readings fall through.
    if p <= price[low_idx] * (1.0 + EXTREME_TOLERANCE) && o > oscillator[low_idx] {
        Divergence::Bullish
    } else if p >= price[high_idx] * (1.0 - EXTREME_TOLERANCE) && o < oscillator[high_idx] {
        Divergence::Bearish
    } else {
        Divergence::None
    }
}

/// First index in `range` whose value beats every other under `better`.
/// `None` when the window contains an undefined price.
fn extreme_index<F>(values: &[f64], range: std::ops::Range<usize>, better: F) -> Option<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<usize> = None;
    for idx in range {
        let v = values[idx];
        if v.is_nan() {
            return None;
        }
        match best {
            Some(b) if !better(v, values[b]) => {}
            _ => best = Some(idx),
        }
    }
    best
}
