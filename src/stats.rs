//! One-pass running statistics.
//!
//! Uses Welford's update so the variance stays accurate when the values are
//! large relative to their spread. The accumulator has no removal operation:
//! callers rebuild it from the values they care about.
//!
//! Values are stored divided by the power of two just below the largest
//! magnitude seen, so squared deviations stay finite for any finite input.
//! Power-of-two scaling is exact, which keeps results identical to the
//! unscaled update whenever that one would not overflow.

/// Running count, mean and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    n: u64,
    mean: f64,
    m2: f64,
    /// Stored values are `value * 2^-exp`.
    exp: i32,
}

/// Binary exponent of `value`, floored at zero.
fn binary_exponent(value: f64) -> i32 {
    let biased = ((value.to_bits() >> 52) & 0x7ff) as i32;
    (biased - 1023).max(0)
}

/// Exact `2^exp` for `0 <= exp <= 1023`.
fn pow2(exp: i32) -> f64 {
    f64::from_bits(((exp + 1023) as u64) << 52)
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    fn scale(&self) -> f64 {
        pow2(self.exp)
    }

    /// Fold one observation into the accumulator.
    pub fn increment(&mut self, value: f64) {
        if value.is_finite() {
            let exp = binary_exponent(value);
            if exp > self.exp {
                let shrink = pow2(exp - self.exp);
                self.mean /= shrink;
                self.m2 = self.m2 / shrink / shrink;
                self.exp = exp;
            }
        }
        let x = value / self.scale();

        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    /// Running mean, NaN when nothing has been observed.
    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            return f64::NAN;
        }
        self.mean * self.scale()
    }

    /// Population variance (divides by n). Can overflow to infinity even when
    /// the standard deviation is finite.
    pub fn variance(&self) -> f64 {
        if self.n == 0 {
            return f64::NAN;
        }
        let scale = self.scale();
        self.m2 / self.n as f64 * scale * scale
    }

    /// Population standard deviation. Zero for a single observation.
    pub fn standard_deviation(&self) -> f64 {
        if self.n == 0 {
            return f64::NAN;
        }
        (self.m2 / self.n as f64).sqrt() * self.scale()
    }
}

impl Extend<f64> for Stats {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.increment(value);
        }
    }
}

impl FromIterator<f64> for Stats {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut stats = Stats::new();
        stats.extend(iter);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_nan() {
        let stats = Stats::new();
        assert_eq!(stats.count(), 0);
        assert!(stats.mean().is_nan());
        assert!(stats.standard_deviation().is_nan());
    }

    #[test]
    fn single_value_has_zero_spread() {
        let stats: Stats = [3.5].into_iter().collect();
        assert_eq!(stats.mean(), 3.5);
        assert_eq!(stats.standard_deviation(), 0.0);
    }

    #[test]
    fn population_standard_deviation() {
        let stats: Stats = [2.0, 4.0, 6.0].into_iter().collect();
        assert_eq!(stats.count(), 3);
        assert!((stats.mean() - 4.0).abs() < 1e-12);
        assert!((stats.variance() - 8.0 / 3.0).abs() < 1e-12);
        assert!((stats.standard_deviation() - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn identical_values_give_exact_zero() {
        let stats: Stats = std::iter::repeat(0.1).take(17).collect();
        assert_eq!(stats.standard_deviation(), 0.0);
    }

    #[test]
    fn large_offset_does_not_cancel() {
        let offset = 1e9;
        let stats: Stats = [offset + 4.0, offset + 7.0, offset + 13.0, offset + 16.0]
            .into_iter()
            .collect();
        assert!((stats.variance() - 22.5).abs() < 1e-6);
    }

    #[test]
    fn huge_values_keep_a_finite_spread() {
        let small: Stats = [3.0, 2.0, 1.0].into_iter().collect();
        let huge: Stats = [3e200, 2e200, 1e200].into_iter().collect();
        assert!(huge.standard_deviation().is_finite());
        assert!((huge.mean() / 1e200 - small.mean()).abs() < 1e-12);
        assert!((huge.standard_deviation() / 1e200 - small.standard_deviation()).abs() < 1e-12);
        assert!(huge.variance().is_infinite());
    }

    #[test]
    fn small_then_huge_values() {
        let stats: Stats = [1.0, f64::MAX, -f64::MAX].into_iter().collect();
        assert!(stats.standard_deviation().is_finite());
        assert!(stats.mean().abs() < f64::MAX);
    }
}
