//! Rolling-window primitives over numeric series.
//!
//! Every function returns a `Vec<f64>` aligned 1:1 with its input. `NaN` marks an
//! undefined value: an output is undefined until `period` consecutive defined inputs
//! have been seen, and any undefined input inside a window makes that window undefined.
//! All windows are computed in a single O(n) pass.

use std::collections::VecDeque;

/// Sliding window with running mean and squared deviations (Welford).
///
/// A window whose members are all identical reports that value as its mean and a
/// deviation of exactly zero, whatever its magnitude.
struct StatsWindow {
    period: usize,
    values: VecDeque<f64>,
    nan_count: usize,
    count: usize,
    mean: f64,
    m2: f64,
    /// Length of the trailing run of identical defined values.
    run: usize,
    pushes_since_resync: usize,
}

impl StatsWindow {
    fn new(period: usize) -> Self {
        Self {
            period,
            values: VecDeque::with_capacity(period + 1),
            nan_count: 0,
            count: 0,
            mean: 0.0,
            m2: 0.0,
            run: 0,
            pushes_since_resync: 0,
        }
    }

    fn push(&mut self, value: f64) {
        self.run = match self.values.back() {
            _ if value.is_nan() => 0,
            Some(&last) if last == value => self.run + 1,
            _ => 1,
        };

        self.values.push_back(value);
        self.insert(value);

        if self.values.len() > self.period {
            if let Some(old) = self.values.pop_front() {
                self.remove(old);
            }
        }

        // Recompute from scratch once per window length so update drift stays bounded.
        self.pushes_since_resync += 1;
        if self.pushes_since_resync >= self.period {
            self.resync();
        }
    }

    fn insert(&mut self, value: f64) {
        if value.is_nan() {
            self.nan_count += 1;
            return;
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn remove(&mut self, value: f64) {
        if value.is_nan() {
            self.nan_count -= 1;
            return;
        }
        self.count -= 1;
        if self.count == 0 {
            self.mean = 0.0;
            self.m2 = 0.0;
            return;
        }
        let delta = value - self.mean;
        self.mean -= delta / self.count as f64;
        self.m2 -= delta * (value - self.mean);
    }

    fn resync(&mut self) {
        self.pushes_since_resync = 0;
        let mut count = 0usize;
        let mut sum = 0.0;
        for v in self.values.iter().filter(|v| !v.is_nan()) {
            count += 1;
            sum += v;
        }
        if count == 0 {
            self.count = 0;
            self.mean = 0.0;
            self.m2 = 0.0;
            return;
        }
        let mean = sum / count as f64;
        self.count = count;
        self.mean = mean;
        self.m2 = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| (v - mean) * (v - mean))
            .sum();
    }

    fn is_full(&self) -> bool {
        self.values.len() == self.period && self.nan_count == 0
    }

    fn is_constant(&self) -> bool {
        self.run >= self.period
    }

    fn mean(&self) -> f64 {
        if !self.is_full() {
            return f64::NAN;
        }
        if self.is_constant() {
            return self.values.back().copied().unwrap_or(f64::NAN);
        }
        self.mean
    }

    /// Sample (n - 1) standard deviation.
    fn sample_std(&self) -> f64 {
        if !self.is_full() || self.period < 2 {
            return f64::NAN;
        }
        if self.is_constant() {
            return 0.0;
        }
        (self.m2.max(0.0) / (self.period - 1) as f64).sqrt()
    }
}

/// Simple moving average.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    let mut window = StatsWindow::new(period);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            window.mean()
        })
        .collect()
}

/// Rolling sample standard deviation.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    let mut window = StatsWindow::new(period);
    values
        .iter()
        .map(|&v| {
            window.push(v);
            window.sample_std()
        })
        .collect()
}

/// Rolling minimum.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, |candidate, kept| candidate <= kept)
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, |candidate, kept| candidate >= kept)
}

/// Monotonic-deque window extreme. `dominates(new, old)` evicts `old` from the back.
fn rolling_extreme<F>(values: &[f64], period: usize, dominates: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> bool,
{
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut last_nan: Option<usize> = None;

    for (i, &value) in values.iter().enumerate() {
        while deque.front().is_some_and(|&front| front + period <= i) {
            deque.pop_front();
        }

        if value.is_nan() {
            last_nan = Some(i);
        } else {
            while deque.back().is_some_and(|&back| dominates(value, values[back])) {
                deque.pop_back();
            }
            deque.push_back(i);
        }

        let window_clean = last_nan.map_or(true, |n| n + period <= i);
        if i + 1 >= period && window_clean {
            if let Some(&front) = deque.front() {
                out[i] = values[front];
            }
        }
    }

    out
}

/// First-order difference; the first entry is undefined.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Value at `index` if it is defined.
pub fn defined_at(values: &[f64], index: usize) -> Option<f64> {
    values.get(index).copied().filter(|v| v.is_finite())
}

/// Latest value if it is defined.
pub fn last_defined(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| v.is_finite())
}

/// Value one bar before the latest, if defined.
pub fn previous_defined(values: &[f64]) -> Option<f64> {
    values
        .len()
        .checked_sub(2)
        .and_then(|i| defined_at(values, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            if e.is_nan() {
                assert!(a.is_nan(), "expected NaN, got {}", a);
            } else {
                assert!((a - e).abs() < 1e-9, "expected {}, got {}", e, a);
            }
        }
    }

    const N: f64 = f64::NAN;

    #[test]
    fn test_rolling_mean() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_series(&out, &[N, N, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rolling_mean_skips_undefined_windows() {
        let out = rolling_mean(&[N, 2.0, 4.0, 6.0, N, 1.0, 3.0], 2);
        assert_series(&out, &[N, N, 3.0, 5.0, N, N, 2.0]);
    }

    #[test]
    fn test_rolling_std_is_sample() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // Population std of this set is 2.0; sample std is sqrt(32 / 7).
        assert!((out[7] - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(out[6].is_nan());
    }

    #[test]
    fn test_rolling_std_constant_is_zero() {
        let out = rolling_std(&[100.0; 30], 20);
        assert_eq!(out[29], 0.0);
    }

    #[test]
    fn test_constant_window_is_exact_at_any_price() {
        for price in [2034.57, 67123.45, 0.1, 1.23456789] {
            let mut values = vec![price * 1.5, price * 0.5, price * 1.1];
            values.extend(std::iter::repeat(price).take(25));
            let last = values.len() - 1;

            assert_eq!(rolling_mean(&values, 20)[last], price, "mean at {}", price);
            assert_eq!(rolling_std(&values, 20)[last], 0.0, "std at {}", price);
        }
    }

    #[test]
    fn test_rolling_std_large_offset() {
        // Small spread on a large level keeps its precision.
        let values: Vec<f64> = (0..60).map(|i| 67_000.0 + (i % 3) as f64 * 0.01).collect();
        let out = rolling_std(&values, 20);
        let window = &values[40..60];
        let mean = window.iter().sum::<f64>() / 20.0;
        let naive = (window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 19.0).sqrt();
        assert!((out[59] - naive).abs() < 1e-9);
    }

    #[test]
    fn test_zero_run_after_movement_is_exactly_zero() {
        let mut values = vec![3.0, 0.7, 1.9];
        values.extend([0.0; 14]);
        let out = rolling_mean(&values, 14);
        assert_eq!(out[16], 0.0);
    }

    #[test]
    fn test_rolling_min_max() {
        let values = [5.0, 3.0, 4.0, 1.0, 2.0, 6.0];
        assert_series(&rolling_min(&values, 3), &[N, N, 3.0, 1.0, 1.0, 1.0]);
        assert_series(&rolling_max(&values, 3), &[N, N, 5.0, 4.0, 4.0, 6.0]);
    }

    #[test]
    fn test_rolling_extreme_with_undefined() {
        let values = [N, N, 3.0, 1.0, 2.0, N, 5.0, 4.0];
        assert_series(&rolling_min(&values, 2), &[N, N, N, 1.0, 1.0, N, N, 4.0]);
        assert_series(&rolling_max(&values, 2), &[N, N, N, 3.0, 2.0, N, N, 5.0]);
    }

    #[test]
    fn test_rolling_matches_naive_scan() {
        let values: Vec<f64> = (0..200)
            .map(|i| ((i as f64) * 0.37).sin() * 10.0 + (i % 7) as f64)
            .collect();
        let period = 14;
        let mean = rolling_mean(&values, period);
        let min = rolling_min(&values, period);
        let max = rolling_max(&values, period);
        for i in (period - 1)..values.len() {
            let window = &values[i + 1 - period..=i];
            let naive_mean = window.iter().sum::<f64>() / period as f64;
            let naive_min = window.iter().cloned().fold(f64::INFINITY, f64::min);
            let naive_max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!((mean[i] - naive_mean).abs() < 1e-9);
            assert_eq!(min[i], naive_min);
            assert_eq!(max[i], naive_max);
        }
    }

    #[test]
    fn test_diff() {
        assert_series(&diff(&[1.0, 4.0, 2.0]), &[N, 3.0, -2.0]);
        assert!(diff(&[]).is_empty());
    }

    #[test]
    fn test_latest_accessors() {
        let values = [1.0, 2.0, N];
        assert_eq!(last_defined(&values), None);
        assert_eq!(previous_defined(&values), Some(2.0));
        assert_eq!(last_defined(&[7.0]), Some(7.0));
        assert_eq!(previous_defined(&[7.0]), None);
    }

    #[test]
    fn test_zero_period() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(rolling_max(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
