use std::ops::Range;

use crate::summary;

/// Equal-width frequency distribution of a dataset.
///
/// Bins span the data range, or an explicit display range. With an explicit
/// range, values outside it are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bins in ascending order. Empty when there was nothing to count.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// Values covered by this bin (inclusive start, exclusive end; the last
    /// bin also includes its end).
    pub range: Range<f64>,
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram with `num_bins` equal-width bins.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points. NaN values are ignored.
    /// * `num_bins` - Number of bins. Zero yields an empty histogram.
    /// * `range` - Optional `(min, max)` display range overriding the data range.
    ///
    /// A zero-width range (all values equal) is widened to ±0.5 around the value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use friendgraph_stats::histogram::Histogram;
    /// let histogram = Histogram::new([1.0, 2.0, 2.5, 9.0], 4, Some((0.0, 4.0)));
    /// assert_eq!(histogram.counts(), vec![0, 1, 2, 0]);
    /// assert_eq!(histogram.total(), 3);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize, range: Option<(f64, f64)>) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let sorted = summary::sorted_values(values);
        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Self { bins: vec![] };
        };
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let (mut lo, mut hi) = match range {
            Some((a, b)) if a <= b => (a, b),
            Some((a, b)) => (b, a),
            None => (*first, *last),
        };
        if hi - lo <= 0.0 {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / num_bins as f64;

        let mut bins = (0..num_bins)
            .map(|i| HistogramBin {
                // Recompute from `lo` to avoid accumulating rounding error
                range: lo + width * i as f64..lo + width * (i + 1) as f64,
                count: 0,
            })
            .collect::<Vec<_>>();

        for &value in sorted.iter().filter(|v| (lo..=hi).contains(*v)) {
            let idx = (((value - lo) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Number of values counted across all bins.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Probability density per bin: `count / (total * bin_width)`.
    ///
    /// The densities integrate to 1 over the histogram range (all zero if
    /// nothing was counted).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn density(&self) -> Vec<f64> {
        let total = self.total();
        self.bins
            .iter()
            .map(|bin| {
                if total == 0 {
                    0.0
                } else {
                    bin.count as f64 / (total as f64 * (bin.range.end - bin.range.start))
                }
            })
            .collect()
    }
}
