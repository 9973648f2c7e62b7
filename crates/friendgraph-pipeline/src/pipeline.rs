//! End-to-end dataset preparation
//!
//! [`prepare`] runs every stage in order on a loaded population:
//!
//! ```text
//! records
//!   → remove / binarize attributes      (transform)
//!   → designate label                   (transform)
//!   → check schema                      (record)
//!   → balance classes                   (sample)
//!   → shuffle (optional)
//!   → min-max normalize                 (normalization)
//!   → feature vectors + labels          (vectorize)
//!   → train / test / positive test      (partition)
//! ```
//!
//! All knobs live in [`PipelineConfig`], which deserializes from JSON:
//!
//! ```json
//! {
//!   "label_attribute": "tip_count",
//!   "schema": ["review_length", "reading_level", "pagerank"],
//!   "normalize_excluded": ["user_id"],
//!   "training_fraction": 0.7,
//!   "seed": 42
//! }
//! ```

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{
    PipelineError,
    normalization::NormalizationParams,
    partition::{self, DEFAULT_TRAINING_FRACTION, DatasetSplit},
    record::{AttributeSchema, LABEL_KEY, UserRecord},
    sample, transform, vectorize,
};

/// Settings for [`prepare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Attribute that becomes the classification target
    pub label_attribute: String,
    /// Feature columns, in output order
    pub schema: AttributeSchema,
    /// Binarize the label attribute before designating it (counts → has/has not)
    #[serde(default = "default_true")]
    pub binarize_label: bool,
    /// Additional attributes to binarize
    #[serde(default)]
    pub binarize: Vec<String>,
    /// Attributes dropped before anything else runs
    #[serde(default)]
    pub remove: Vec<String>,
    /// Feature columns left untouched by normalization
    ///
    /// Only schema columns are normalized: the label key and any attribute
    /// outside the schema (identifiers, unused joined attributes) are always
    /// skipped.
    #[serde(default)]
    pub normalize_excluded: Vec<String>,
    /// Reserved key the label is stored under
    #[serde(default = "default_label_key")]
    pub label_key: String,
    /// Share of the balanced dataset used for training
    #[serde(default = "default_training_fraction")]
    pub training_fraction: f64,
    /// Shuffle the balanced dataset before partitioning
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Seed for sampling and shuffling; drawn at random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_label_key() -> String {
    LABEL_KEY.to_owned()
}

fn default_training_fraction() -> f64 {
    DEFAULT_TRAINING_FRACTION
}

impl PipelineConfig {
    #[must_use]
    pub fn new(label_attribute: impl Into<String>, schema: AttributeSchema) -> Self {
        Self {
            label_attribute: label_attribute.into(),
            schema,
            binarize_label: true,
            binarize: vec![],
            remove: vec![],
            normalize_excluded: vec![],
            label_key: default_label_key(),
            training_fraction: DEFAULT_TRAINING_FRACTION,
            shuffle: true,
            seed: None,
        }
    }

    /// Rejects settings that would fail late in the pipeline.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.training_fraction) {
            return Err(PipelineError::InvalidFraction {
                fraction: self.training_fraction,
            });
        }
        Ok(())
    }

    /// Attributes a loader needs to keep for this configuration.
    #[must_use]
    pub fn input_attributes(&self) -> Vec<String> {
        let mut attributes = self.schema.attributes().to_vec();
        for name in std::iter::once(&self.label_attribute)
            .chain(&self.binarize)
            .chain(&self.normalize_excluded)
        {
            if !attributes.contains(name) {
                attributes.push(name.clone());
            }
        }
        attributes
    }

    fn excluded_from_normalization(&self, records: &[UserRecord]) -> HashSet<String> {
        let schema = self.schema.attributes();
        let outside_schema = records
            .first()
            .into_iter()
            .flat_map(UserRecord::attributes)
            .filter(|attribute| !schema.iter().any(|s| s == attribute))
            .map(str::to_owned);
        self.normalize_excluded
            .iter()
            .cloned()
            .chain([self.label_key.clone()])
            .chain(outside_schema)
            .collect()
    }
}

/// Result of [`prepare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedDataset {
    /// Number of records before balancing
    pub population: usize,
    /// Number of records after balancing
    pub sampled: usize,
    /// Ranges used to normalize each attribute
    pub normalization: NormalizationParams,
    pub split: DatasetSplit,
}

/// Runs the full pipeline on `records`.
///
/// `records` is consumed: transforms rewrite it in place and balancing moves
/// the selected records into a new collection.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::{pipeline::{PipelineConfig, prepare}, record::{AttributeSchema, UserRecord}};
/// use rand::SeedableRng as _;
///
/// let records = (0..20)
///     .map(|i| UserRecord::from_iter([("fans", f64::from(i)), ("tips", f64::from(i % 4))]))
///     .collect();
/// let config = PipelineConfig::new("tips", AttributeSchema::new(["fans"]).unwrap());
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let prepared = prepare(records, &config, &mut rng).unwrap();
///
/// assert_eq!(prepared.sampled, 10);
/// assert_eq!(prepared.split.train.len(), 7);
/// ```
pub fn prepare<R>(
    mut records: Vec<UserRecord>,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<PreparedDataset, PipelineError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let population = records.len();
    log::info!("preparing dataset from {population} users");

    for attribute in &config.remove {
        transform::remove_attribute(&mut records, attribute);
    }
    for attribute in &config.binarize {
        transform::binarize(&mut records, attribute)?;
    }
    if config.binarize_label {
        transform::binarize(&mut records, &config.label_attribute)?;
    }
    transform::designate_label(&mut records, &config.label_attribute, &config.label_key)?;
    config.schema.validate(&records)?;

    let mut records = sample::stratified_boolean_sample(records, &config.label_key, rng)?;
    let sampled = records.len();
    log::info!("balanced {population} users down to {sampled}");
    if config.shuffle {
        records.shuffle(rng);
    }

    let excluded = config.excluded_from_normalization(&records);
    let normalization = NormalizationParams::fit(&records, &excluded)?;
    normalization.apply(&mut records)?;

    let (features, labels) = vectorize::vectorize(&records, &config.schema, &config.label_key)?;
    let split = partition::partition(&features, &labels, config.training_fraction)?;
    log::info!(
        "split into {} training, {} test ({} positive) vectors",
        split.train.len(),
        split.test.len(),
        split.positive_test.len()
    );

    Ok(PreparedDataset {
        population,
        sampled,
        normalization,
        split,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::record::AttributeValue;

    fn users() -> Vec<UserRecord> {
        (0..40u32)
            .map(|i| {
                UserRecord::from_iter([
                    ("user_id", AttributeValue::Text(format!("u{i}"))),
                    ("review_length", f64::from(i * 10).into()),
                    ("reading_level", f64::from(i % 9).into()),
                    ("fans", f64::from(i % 5).into()),
                    ("tip_count", f64::from(if i % 4 == 0 { i + 1 } else { 0 }).into()),
                ])
            })
            .collect()
    }

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig::new(
            "tip_count",
            AttributeSchema::new(["review_length", "reading_level", "fans"]).unwrap(),
        );
        config.normalize_excluded = vec!["user_id".into()];
        config
    }

    #[test]
    fn test_prepare_end_to_end() {
        let prepared = prepare(users(), &config(), &mut Pcg64::seed_from_u64(5)).unwrap();

        assert_eq!(prepared.population, 40);
        assert_eq!(prepared.sampled, 20);
        let split = &prepared.split;
        assert_eq!(split.train.len(), 14);
        assert_eq!(split.test.len(), 6);
        assert_eq!(split.train.count_label(1) + split.test.count_label(1), 10);
        for vector in split.train.features.iter().chain(&split.test.features) {
            assert_eq!(vector.len(), 3);
            assert!(vector.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        let attributes = prepared
            .normalization
            .ranges
            .iter()
            .map(|r| r.attribute.as_str())
            .collect::<Vec<_>>();
        assert_eq!(attributes, ["fans", "reading_level", "review_length"]);
    }

    #[test]
    fn test_prepare_is_reproducible() {
        let a = prepare(users(), &config(), &mut Pcg64::seed_from_u64(11)).unwrap();
        let b = prepare(users(), &config(), &mut Pcg64::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_without_shuffle_positives_lead() {
        let mut config = config();
        config.shuffle = false;
        config.training_fraction = 0.5;
        let prepared = prepare(users(), &config, &mut Pcg64::seed_from_u64(0)).unwrap();
        assert!(prepared.split.train.labels.iter().all(|l| *l == 1));
        assert!(prepared.split.test.labels.iter().all(|l| *l == 0));
        assert!(prepared.split.positive_test.is_empty());
    }

    #[test]
    fn test_custom_label_key() {
        let mut config = config();
        config.label_key = "target".into();
        let prepared = prepare(users(), &config, &mut Pcg64::seed_from_u64(5)).unwrap();
        assert_eq!(prepared.sampled, 20);
        assert_eq!(
            prepared.split.train.count_label(1) + prepared.split.test.count_label(1),
            10
        );
        assert!(
            prepared
                .normalization
                .ranges
                .iter()
                .all(|r| r.attribute != "target")
        );
    }

    #[test]
    fn test_non_feature_attributes_skip_normalization() {
        let mut config = config();
        config.normalize_excluded.clear();
        let mut users = users();
        for user in &mut users {
            user.insert("region", 1.0);
        }
        let prepared = prepare(users, &config, &mut Pcg64::seed_from_u64(0)).unwrap();
        assert_eq!(prepared.normalization.ranges.len(), 3);
    }

    #[test]
    fn test_non_numeric_feature_fails() {
        let mut config = config();
        config.normalize_excluded.clear();
        config.schema = AttributeSchema::new(["review_length", "user_id"]).unwrap();
        assert!(matches!(
            prepare(users(), &config, &mut Pcg64::seed_from_u64(0)),
            Err(PipelineError::NonNumericAttribute { .. })
        ));
    }

    #[test]
    fn test_removed_identifier_passes() {
        let mut config = config();
        config.normalize_excluded.clear();
        config.remove = vec!["user_id".into()];
        assert!(prepare(users(), &config, &mut Pcg64::seed_from_u64(0)).is_ok());
    }

    #[test]
    fn test_schema_checked_before_sampling() {
        let mut config = config();
        config.schema = AttributeSchema::new(["review_length", "pagerank"]).unwrap();
        assert_eq!(
            prepare(users(), &config, &mut Pcg64::seed_from_u64(0)).unwrap_err(),
            PipelineError::MissingAttribute {
                attribute: "pagerank".into(),
                record: 0
            }
        );
    }

    #[test]
    fn test_invalid_fraction_rejected_up_front() {
        let mut config = config();
        config.training_fraction = 1.2;
        assert!(matches!(
            prepare(users(), &config, &mut Pcg64::seed_from_u64(0)),
            Err(PipelineError::InvalidFraction { .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"label_attribute": "tip_count", "schema": ["fans"], "seed": 4}"#,
        )
        .unwrap();
        assert_eq!(config.label_key, LABEL_KEY);
        assert!(config.binarize_label);
        assert!(config.shuffle);
        assert_eq!(config.training_fraction, DEFAULT_TRAINING_FRACTION);
        assert_eq!(config.seed, Some(4));
        assert!(serde_json::from_str::<PipelineConfig>(r#"{"schema": ["fans"]}"#).is_err());
    }

    #[test]
    fn test_input_attributes() {
        let mut config = config();
        config.binarize = vec!["fans".into()];
        assert_eq!(
            config.input_attributes(),
            ["review_length", "reading_level", "fans", "tip_count", "user_id"]
        );
    }
}
