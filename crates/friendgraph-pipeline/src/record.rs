//! User records, attribute values and feature schemas
//!
//! A [`UserRecord`] is the attribute map of one user. Attributes are dynamic:
//! loaders decide which ones exist, and an [`AttributeSchema`] fixes the column
//! order used when records become feature vectors.
//!
//! # Label
//!
//! Once [`designate_label`](crate::transform::designate_label) has run, every
//! record holds its classification target under the label key ([`LABEL_KEY`]
//! unless configured otherwise). Label values are restricted to 0 and 1 (see
//! [`UserRecord::label`]).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Reserved attribute name holding the classification target.
pub const LABEL_KEY: &str = "label";

/// Binary classification target (0 or 1).
pub type Label = u8;

/// Numeric values of one user, positionally aligned to an [`AttributeSchema`].
pub type FeatureVector = Vec<f64>;

/// A single attribute value as read from a user file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum AttributeValue {
    #[display("null")]
    Null,
    Bool(bool),
    Number(f64),
    #[display("{_0:?}")]
    Text(String),
}

impl AttributeValue {
    /// Whether the value counts as "set": nonzero, non-empty, `true`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Null => false,
            AttributeValue::Bool(b) => *b,
            AttributeValue::Number(n) => *n != 0.0,
            AttributeValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value. Booleans map to 0 and 1.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Bool(b) => Some(f64::from(u8::from(*b))),
            AttributeValue::Null | AttributeValue::Text(_) => None,
        }
    }

    /// Label view of the value: `Some` only for 0, 1, `false` or `true`.
    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn as_label(&self) -> Option<Label> {
        let value = self.as_f64()?;
        if value == 0.0 {
            Some(0)
        } else if value == 1.0 {
            Some(1)
        } else {
            None
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_owned())
    }
}

/// Attribute map of one user.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::record::{AttributeValue, UserRecord};
///
/// let record = UserRecord::from_iter([("user_id", AttributeValue::from("u1")), ("fans", 3.0.into())]);
/// assert_eq!(record.get("fans"), Some(&AttributeValue::Number(3.0)));
/// assert!(!record.contains("label"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    attributes: BTreeMap<String, AttributeValue>,
}

impl<K, V> FromIterator<(K, V)> for UserRecord
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl UserRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    pub fn insert<K, V>(&mut self, attribute: K, value: V) -> Option<AttributeValue>
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.attributes.insert(attribute.into(), value.into())
    }

    pub fn remove(&mut self, attribute: &str) -> Option<AttributeValue> {
        self.attributes.remove(attribute)
    }

    /// Attribute names in sorted order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Looks up `attribute`, failing with [`PipelineError::MissingAttribute`].
    ///
    /// `index` is the position of this record in its population and is only
    /// used for the error report.
    pub fn require(&self, attribute: &str, index: usize) -> Result<&AttributeValue, PipelineError> {
        self.get(attribute)
            .ok_or_else(|| PipelineError::MissingAttribute {
                attribute: attribute.to_owned(),
                record: index,
            })
    }

    /// Looks up a numeric attribute.
    pub fn require_f64(&self, attribute: &str, index: usize) -> Result<f64, PipelineError> {
        self.require(attribute, index)?
            .as_f64()
            .ok_or_else(|| PipelineError::NonNumericAttribute {
                attribute: attribute.to_owned(),
                record: index,
            })
    }

    /// Reads the boolean label stored under `label_key`.
    pub fn label(&self, label_key: &str, index: usize) -> Result<Label, PipelineError> {
        let value = self.require(label_key, index)?;
        value.as_label().ok_or_else(|| PipelineError::InvalidLabel {
            record: index,
            value: value.to_string(),
        })
    }
}

/// Ordered list of attribute names defining feature-vector columns.
///
/// Names are unique. The label attribute may appear in a schema (for example
/// when the same list is used to select attributes at load time); it is
/// skipped when vectors are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AttributeSchema {
    attributes: Vec<String>,
}

impl TryFrom<Vec<String>> for AttributeSchema {
    type Error = PipelineError;

    fn try_from(attributes: Vec<String>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for attribute in &attributes {
            if !seen.insert(attribute.as_str()) {
                return Err(PipelineError::DuplicateSchemaAttribute {
                    attribute: attribute.clone(),
                });
            }
        }
        Ok(Self { attributes })
    }
}

impl From<AttributeSchema> for Vec<String> {
    fn from(schema: AttributeSchema) -> Self {
        schema.attributes
    }
}

impl AttributeSchema {
    pub fn new<I, S>(attributes: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::try_from(attributes.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Feature columns: the schema attributes other than `label_key`, in order.
    pub fn columns<'a>(&'a self, label_key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .map(String::as_str)
            .filter(move |a| *a != label_key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Checks that every record carries every schema attribute.
    ///
    /// Run this at ingestion so a malformed population is rejected before any
    /// stage touches it.
    pub fn validate(&self, records: &[UserRecord]) -> Result<(), PipelineError> {
        for (index, record) in records.iter().enumerate() {
            for attribute in &self.attributes {
                record.require(attribute, index)?;
            }
        }
        Ok(())
    }
}
