use chrono::{DateTime, Utc};
use friendgraph_pipeline::{
    normalization::NormalizationParams, partition::DatasetSplit, record::AttributeSchema,
};
use serde::{Deserialize, Serialize};

/// Prepared dataset as written by the `prepare` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub metadata: DatasetMetadata,
    /// Training, test and positive-recall test sets
    pub split: DatasetSplit,
}

/// Provenance of a prepared dataset, sufficient to reproduce it from the same input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Timestamp when the dataset was created (ISO 8601 format)
    pub created_at: DateTime<Utc>,
    /// Seed used for class balancing and shuffling
    pub seed: u64,
    /// Attribute the label was taken from
    pub label_attribute: String,
    /// Feature column order of every vector in `split`
    pub schema: AttributeSchema,
    pub training_fraction: f64,
    /// Number of users loaded
    pub population: usize,
    /// Number of users left after class balancing
    pub sampled: usize,
    /// Min-max ranges applied to each attribute
    pub normalization: NormalizationParams,
}
