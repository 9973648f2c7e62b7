//! Feature engineering and dataset partitioning for social-graph user data
//!
//! This crate turns per-user attribute records (review length, reading level,
//! tip count, `PageRank`, ...) into a balanced, normalized and vectorized
//! dataset split ready for a binary classifier.
//!
//! # Overview
//!
//! The pipeline runs leaf-first through these stages:
//!
//! 1. **Load Records** ([`loader`]): Join per-user attribute files or read a combined user file
//! 2. **Transform Attributes** ([`transform`]): Remove, binarize and designate the label attribute
//! 3. **Balance Classes** ([`sample::stratified_boolean_sample`]): Subsample the majority class
//! 4. **Normalize** ([`normalization::normalize`]): Min-max scale attributes to [0, 1]
//! 5. **Vectorize** ([`vectorize::vectorize`]): Materialize feature vectors in schema order
//! 6. **Partition** ([`partition::partition`]): Split into training, test and positive-recall sets
//!
//! [`pipeline::prepare`] composes all of the stages from a [`pipeline::PipelineConfig`].
//!
//! # Ownership
//!
//! Stages that take `&mut [UserRecord]` rewrite records in place
//! ([`transform`], [`normalization`]). Stages that return a new collection take
//! their input by value ([`sample`]) or by shared reference ([`vectorize`],
//! [`partition`]).
//!
//! # Examples
//!
//! ```
//! use friendgraph_pipeline::{
//!     normalization, partition, record::{AttributeSchema, LABEL_KEY, UserRecord},
//!     sample, transform, vectorize,
//! };
//! use rand::SeedableRng as _;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut records = (0..10)
//!     .map(|i| UserRecord::from_iter([("review_length", f64::from(i)), ("tips", f64::from(i % 3))]))
//!     .collect::<Vec<_>>();
//!
//! transform::binarize(&mut records, "tips")?;
//! transform::designate_label(&mut records, "tips", LABEL_KEY)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut sampled = sample::stratified_boolean_sample(records, LABEL_KEY, &mut rng)?;
//!
//! normalization::normalize(&mut sampled, &[LABEL_KEY.to_owned()].into())?;
//!
//! let schema = AttributeSchema::new(["review_length"])?;
//! let (features, labels) = vectorize::vectorize(&sampled, &schema, LABEL_KEY)?;
//! let split = partition::partition(&features, &labels, 0.5)?;
//!
//! assert_eq!(split.train.len() + split.test.len(), sampled.len());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod normalization;
pub mod partition;
pub mod pipeline;
pub mod record;
pub mod sample;
pub mod transform;
pub mod vectorize;

/// Failure raised by a pipeline stage.
///
/// Every variant describes malformed input. Stages check their input before
/// mutating anything, so a returned error means no record was changed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PipelineError {
    #[display("record {record} is missing attribute '{attribute}'")]
    MissingAttribute { attribute: String, record: usize },
    #[display("record {record} has label {value}, expected 0 or 1")]
    InvalidLabel { record: usize, value: String },
    #[display("training fraction {fraction} is outside [0, 1]")]
    InvalidFraction { fraction: f64 },
    #[display("attribute '{attribute}' has the constant value {value}; cannot min-max normalize")]
    DegenerateRange { attribute: String, value: f64 },
    #[display("record {record} has a non-numeric value for attribute '{attribute}'")]
    NonNumericAttribute { attribute: String, record: usize },
    #[display("{features} feature vectors but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[display("attribute '{attribute}' appears more than once in the schema")]
    DuplicateSchemaAttribute { attribute: String },
}
