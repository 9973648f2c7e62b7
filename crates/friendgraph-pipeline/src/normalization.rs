//! Min-max normalization of user attributes
//!
//! Each considered attribute is rescaled to [0, 1] using the minimum and
//! maximum observed across the whole population:
//!
//! ```text
//! normalized = (value - min) / (max - min)
//! ```
//!
//! # Considered Attributes
//!
//! The attribute set is taken from the first record, minus the caller's
//! exclusions (identifiers, the label, ...). Every record must carry every
//! considered attribute with a numeric value. Attributes that appear only on
//! later records are left untouched.
//!
//! # Constant Attributes
//!
//! An attribute whose minimum equals its maximum has no range to scale into.
//! This is reported as [`PipelineError::DegenerateRange`] instead of producing
//! NaN; exclude or remove the attribute to proceed.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! use friendgraph_pipeline::{normalization::normalize, record::{AttributeValue, UserRecord}};
//!
//! let mut records = vec![
//!     UserRecord::from_iter([("user_id", AttributeValue::from("a")), ("fans", 10.0.into())]),
//!     UserRecord::from_iter([("user_id", AttributeValue::from("b")), ("fans", 30.0.into())]),
//!     UserRecord::from_iter([("user_id", AttributeValue::from("c")), ("fans", 20.0.into())]),
//! ];
//! let excluded = HashSet::from(["user_id".to_owned()]);
//! normalize(&mut records, &excluded).unwrap();
//! assert_eq!(records[2].get("fans"), Some(&AttributeValue::Number(0.5)));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    PipelineError,
    record::{AttributeValue, UserRecord},
};

/// Observed range of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    pub attribute: String,
    pub min: f64,
    pub max: f64,
}

impl AttributeRange {
    /// Maps `min` to 0 and `max` to 1.
    ///
    /// Ranges wider than `f64::MAX` are scaled on halved operands so the
    /// endpoints stay finite.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width.is_finite() {
            (value - self.min) / width
        } else {
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }
}

/// Ranges fitted over a population, one per considered attribute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationParams {
    pub ranges: Vec<AttributeRange>,
}

impl NormalizationParams {
    /// Computes the per-attribute ranges without modifying `records`.
    ///
    /// Fails if a record lacks a considered attribute, if a value is not
    /// numeric, or if an attribute is constant across the population.
    pub fn fit(records: &[UserRecord], excluded: &HashSet<String>) -> Result<Self, PipelineError> {
        let Some(first) = records.first() else {
            return Ok(Self::default());
        };

        let mut ranges = first
            .attributes()
            .filter(|attribute| !excluded.contains(*attribute))
            .map(|attribute| AttributeRange {
                attribute: attribute.to_owned(),
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            })
            .collect::<Vec<_>>();

        for (index, record) in records.iter().enumerate() {
            for range in &mut ranges {
                let value = record.require_f64(&range.attribute, index)?;
                range.min = range.min.min(value);
                range.max = range.max.max(value);
            }
        }

        if let Some(range) = ranges.iter().find(|r| r.max <= r.min) {
            return Err(PipelineError::DegenerateRange {
                attribute: range.attribute.clone(),
                value: range.min,
            });
        }

        Ok(Self { ranges })
    }

    /// Rewrites every considered attribute of `records` in place.
    ///
    /// Records are expected to have been validated by [`fit`](Self::fit) (or
    /// to come from the same population); an attribute that is missing or
    /// non-numeric on a record is reported rather than skipped.
    pub fn apply(&self, records: &mut [UserRecord]) -> Result<(), PipelineError> {
        for (index, record) in records.iter().enumerate() {
            for range in &self.ranges {
                record.require_f64(&range.attribute, index)?;
            }
        }
        for record in records.iter_mut() {
            for range in &self.ranges {
                if let Some(value) = record.get(&range.attribute).and_then(AttributeValue::as_f64)
                {
                    record.insert(range.attribute.as_str(), range.scale(value));
                }
            }
        }
        Ok(())
    }
}

/// Min-max normalizes every non-excluded attribute of `records` in place.
///
/// Returns the same records for chaining. On error nothing is modified.
pub fn normalize<'a>(
    records: &'a mut [UserRecord],
    excluded: &HashSet<String>,
) -> Result<&'a mut [UserRecord], PipelineError> {
    let params = NormalizationParams::fit(records, excluded)?;
    for range in &params.ranges {
        log::debug!(
            "normalizing '{}' from [{}, {}]",
            range.attribute,
            range.min,
            range.max
        );
    }
    params.apply(records)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(record: &UserRecord, attribute: &str) -> f64 {
        record.get(attribute).and_then(AttributeValue::as_f64).unwrap()
    }

    fn population() -> Vec<UserRecord> {
        vec![
            UserRecord::from_iter([("id", 1.0), ("length", 120.0), ("level", 8.5), ("label", 1.0)]),
            UserRecord::from_iter([("id", 2.0), ("length", 40.0), ("level", 12.0), ("label", 0.0)]),
            UserRecord::from_iter([("id", 3.0), ("length", 80.0), ("level", 5.0), ("label", 0.0)]),
            UserRecord::from_iter([("id", 4.0), ("length", 60.0), ("level", 6.4), ("label", 1.0)]),
        ]
    }

    fn excluded(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_range_and_endpoints() {
        let mut records = population();
        normalize(&mut records, &excluded(&["id", "label"])).unwrap();

        for record in &records {
            for attribute in ["length", "level"] {
                let v = value(record, attribute);
                assert!((0.0..=1.0).contains(&v), "{attribute}={v}");
            }
        }
        assert_eq!(value(&records[0], "length"), 1.0);
        assert_eq!(value(&records[1], "length"), 0.0);
        assert_eq!(value(&records[1], "level"), 1.0);
        assert_eq!(value(&records[2], "level"), 0.0);
        assert_eq!(value(&records[2], "length"), 0.5);
    }

    #[test]
    fn test_excluded_pass_through() {
        let original = population();
        let mut records = original.clone();
        normalize(&mut records, &excluded(&["id", "label"])).unwrap();
        for (before, after) in original.iter().zip(&records) {
            assert_eq!(before.get("id"), after.get("id"));
            assert_eq!(before.get("label"), after.get("label"));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut records = population();
        for record in &mut records {
            record.insert("constant", 3.0);
        }
        let before = records.clone();
        let err = normalize(&mut records, &excluded(&["id"])).unwrap_err();
        assert_eq!(
            err,
            PipelineError::DegenerateRange {
                attribute: "constant".into(),
                value: 3.0
            }
        );
        assert_eq!(records, before);

        // excluding the constant attribute lets the rest through
        normalize(&mut records, &excluded(&["id", "constant"])).unwrap();
        assert_eq!(value(&records[0], "constant"), 3.0);
    }

    #[test]
    fn test_extreme_values_stay_in_range() {
        let mut records = vec![
            UserRecord::from_iter([("score", -1e308)]),
            UserRecord::from_iter([("score", 1e308)]),
            UserRecord::from_iter([("score", 0.0)]),
        ];
        normalize(&mut records, &HashSet::new()).unwrap();
        assert_eq!(value(&records[0], "score"), 0.0);
        assert_eq!(value(&records[1], "score"), 1.0);
        assert_eq!(value(&records[2], "score"), 0.5);
    }

    #[test]
    fn test_non_numeric_attribute() {
        let mut records = population();
        records[2].insert("id", "three");
        assert_eq!(
            normalize(&mut records, &excluded(&["label"])).unwrap_err(),
            PipelineError::NonNumericAttribute {
                attribute: "id".into(),
                record: 2
            }
        );
    }

    #[test]
    fn test_missing_attribute() {
        let mut records = population();
        records[3].remove("level");
        assert!(matches!(
            normalize(&mut records, &excluded(&["id", "label"])),
            Err(PipelineError::MissingAttribute { record: 3, .. })
        ));
    }

    #[test]
    fn test_extra_attribute_on_later_record_untouched() {
        let mut records = population();
        records[1].insert("extra", 99.0);
        normalize(&mut records, &excluded(&["id", "label"])).unwrap();
        assert_eq!(value(&records[1], "extra"), 99.0);
    }

    #[test]
    fn test_empty_population() {
        let mut records: Vec<UserRecord> = vec![];
        assert!(normalize(&mut records, &HashSet::new()).unwrap().is_empty());
    }

    #[test]
    fn test_fit_then_apply_to_other_population() {
        let train = population();
        let params = NormalizationParams::fit(&train, &excluded(&["id", "label"])).unwrap();
        let mut other = vec![UserRecord::from_iter([("length", 100.0), ("level", 12.0)])];
        params.apply(&mut other).unwrap();
        assert_eq!(value(&other[0], "length"), 0.75);
        assert_eq!(value(&other[0], "level"), 1.0);
    }
}
