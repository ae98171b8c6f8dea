//! Nearest-rank percentiles.

/// Value at the `percentile`-th position of ascending `sorted_values`.
///
/// Nearest-rank: index `floor(n * percentile / 100)`, clamped to the last
/// element. `None` for an empty slice.
///
/// ```
/// use constituency_stats::percentiles::nearest_rank;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(nearest_rank(&values, 50.0), Some(3.0));
/// assert_eq!(nearest_rank(&values, 100.0), Some(5.0));
/// assert_eq!(nearest_rank(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn nearest_rank(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let index = (sorted_values.len() as f64 * percentile.clamp(0.0, 100.0) / 100.0) as usize;
    Some(sorted_values[index.min(last)])
}

/// Lower quartile, median and upper quartile of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl Quartiles {
    /// Computes quartiles of unsorted values; `None` when there are none.
    ///
    /// ```
    /// use constituency_stats::percentiles::Quartiles;
    ///
    /// let q = Quartiles::new([10.0, 1.0, 9.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0, 5.0]).unwrap();
    /// assert_eq!((q.p25, q.p50, q.p75), (3.0, 6.0, 8.0));
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        Some(Self {
            p25: nearest_rank(sorted_values, 25.0)?,
            p50: nearest_rank(sorted_values, 50.0)?,
            p75: nearest_rank(sorted_values, 75.0)?,
        })
    }

    /// Distance between the upper and lower quartile.
    #[must_use]
    pub fn interquartile_range(&self) -> f64 {
        self.p75 - self.p25
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_is_every_quartile() {
        let q = Quartiles::new([4.5]).unwrap();
        assert_eq!((q.p25, q.p50, q.p75), (4.5, 4.5, 4.5));
        assert_eq!(q.interquartile_range(), 0.0);
    }

    #[test]
    fn test_empty_input_has_no_quartiles() {
        assert_eq!(Quartiles::new(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(nearest_rank(&values, -10.0), Some(1.0));
        assert_eq!(nearest_rank(&values, 250.0), Some(3.0));
    }

    #[test]
    fn test_quartiles_are_ordered() {
        let q = Quartiles::new([9.0, 1.0, 5.0, 7.0, 3.0, 2.0]).unwrap();
        assert!(q.p25 <= q.p50 && q.p50 <= q.p75);
        assert_eq!(q.interquartile_range(), q.p75 - q.p25);
    }
}
