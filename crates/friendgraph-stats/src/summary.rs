/// Summary statistics of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median (`sorted[n / 2]`)
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl Summary {
    /// Computes summary statistics from unsorted values.
    ///
    /// NaN values are ignored. Returns `None` if no value remains.
    ///
    /// # Examples
    ///
    /// ```
    /// # use friendgraph_stats::summary::Summary;
    /// let summary = Summary::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(summary.min, 2.0);
    /// assert_eq!(summary.max, 9.0);
    /// assert_eq!(summary.std_dev, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let sorted = sorted_values(values);
        Self::from_sorted(&sorted)
    }

    /// Computes summary statistics from values sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median: sorted_values[count / 2],
            std_dev: variance.sqrt(),
        })
    }
}

/// Collects `values` into ascending order, dropping NaN.
#[must_use]
pub fn sorted_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Nearest-rank percentile of sorted data.
///
/// The k-th percentile of n values is the value at index `floor(n * k / 100)`,
/// clamped to the last value. Returns `None` for empty input.
///
/// # Examples
///
/// ```
/// use friendgraph_stats::summary::percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&values, 50.0), Some(3.0));
/// assert_eq!(percentile(&values, 25.0), Some(2.0));
/// assert_eq!(percentile(&values, 100.0), Some(5.0));
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0) as usize;
    Some(sorted_values[idx.min(last)])
}
