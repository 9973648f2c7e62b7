//! Positional train/test partitioning
//!
//! [`partition`] never shuffles: the training set is a prefix and the test
//! set the remaining suffix of the input. Shuffle beforehand if the input is
//! ordered by label (as the output of
//! [`stratified_boolean_sample`](crate::sample::stratified_boolean_sample) is).

use serde::{Deserialize, Serialize};

use crate::{
    PipelineError,
    record::{FeatureVector, Label},
};

/// Default share of the dataset used for training.
pub const DEFAULT_TRAINING_FRACTION: f64 = 0.7;

/// Parallel feature vectors and labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSet {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<Label>,
}

impl LabeledSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn count_label(&self, label: Label) -> usize {
        self.labels.iter().filter(|l| **l == label).count()
    }
}

/// Training, test and positive-recall test sets.
///
/// `train` and `test` are disjoint and together cover the input.
/// `positive_test` is the subset of `test` labeled 1, in test order; it is
/// used to measure recall on the positive class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit {
    pub train: LabeledSet,
    pub test: LabeledSet,
    pub positive_test: LabeledSet,
}

/// Splits `features`/`labels` into training, test and positive-recall sets.
///
/// With `N = features.len()` and `T = floor(training_fraction * N)`, the
/// training set holds the first `T` entries and the test set the last `N - T`.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::partition::partition;
///
/// let features = (1..=10).map(|i| vec![f64::from(i)]).collect::<Vec<_>>();
/// let labels = [0, 0, 0, 1, 0, 1, 0, 0, 1, 1];
/// let split = partition(&features, &labels, 0.7).unwrap();
///
/// assert_eq!(split.train.len(), 7);
/// assert_eq!(split.test.features, [vec![8.0], vec![9.0], vec![10.0]]);
/// assert_eq!(split.test.labels, [0, 1, 1]);
/// assert_eq!(split.positive_test.labels, [1, 1]);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
pub fn partition(
    features: &[FeatureVector],
    labels: &[Label],
    training_fraction: f64,
) -> Result<DatasetSplit, PipelineError> {
    if !(0.0..=1.0).contains(&training_fraction) {
        return Err(PipelineError::InvalidFraction {
            fraction: training_fraction,
        });
    }
    if features.len() != labels.len() {
        return Err(PipelineError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }

    let n = features.len();
    let train_len = ((training_fraction * n as f64).floor() as usize).min(n);

    let train = LabeledSet {
        features: features[..train_len].to_vec(),
        labels: labels[..train_len].to_vec(),
    };
    let test = LabeledSet {
        features: features[train_len..].to_vec(),
        labels: labels[train_len..].to_vec(),
    };
    let positive_features = test
        .features
        .iter()
        .zip(&test.labels)
        .filter(|(_, label)| **label == 1)
        .map(|(vector, _)| vector.clone())
        .collect::<Vec<_>>();
    let positive_test = LabeledSet {
        labels: vec![1; positive_features.len()],
        features: positive_features,
    };

    log::debug!(
        "partitioned {n} vectors: {} train, {} test, {} positive test",
        train.len(),
        test.len(),
        positive_test.len()
    );

    Ok(DatasetSplit {
        train,
        test,
        positive_test,
    })
}
