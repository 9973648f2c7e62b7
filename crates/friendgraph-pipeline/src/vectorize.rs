//! Conversion of user records into feature and label vectors

use crate::{
    PipelineError,
    record::{AttributeSchema, FeatureVector, Label, UserRecord},
};

/// Builds one feature vector and one label per record, in input order.
///
/// For every record `i` and feature column `j` (the schema attributes other
/// than `label_key`, in schema order), `features[i][j]` is the record's value
/// for that column and `labels[i]` is its label.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::{record::{AttributeSchema, LABEL_KEY, UserRecord}, vectorize};
///
/// let records = vec![UserRecord::from_iter([("b", 2.0), ("a", 1.0), ("label", 1.0)])];
/// let schema = AttributeSchema::new(["b", "a"]).unwrap();
/// let (features, labels) = vectorize::vectorize(&records, &schema, LABEL_KEY).unwrap();
/// assert_eq!(features, [vec![2.0, 1.0]]);
/// assert_eq!(labels, [1]);
/// ```
pub fn vectorize(
    records: &[UserRecord],
    schema: &AttributeSchema,
    label_key: &str,
) -> Result<(Vec<FeatureVector>, Vec<Label>), PipelineError> {
    let mut features = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let vector = schema
            .columns(label_key)
            .map(|attribute| record.require_f64(attribute, index))
            .collect::<Result<FeatureVector, _>>()?;
        features.push(vector);
        labels.push(record.label(label_key, index)?);
    }

    log::debug!(
        "vectorized {} records into {} columns",
        features.len(),
        schema.columns(label_key).count()
    );
    Ok((features, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttributeValue, LABEL_KEY};

    fn population() -> Vec<UserRecord> {
        (0..6)
            .map(|i| {
                UserRecord::from_iter([
                    ("pagerank", f64::from(i) / 10.0),
                    ("reading_level", f64::from(i) + 3.0),
                    ("review_length", f64::from(i) * 25.0),
                    (LABEL_KEY, f64::from(i % 2)),
                ])
            })
            .collect()
    }

    #[test]
    fn test_alignment() {
        let records = population();
        let schema = AttributeSchema::new(["review_length", LABEL_KEY, "pagerank"]).unwrap();
        let (features, labels) = vectorize(&records, &schema, LABEL_KEY).unwrap();

        assert_eq!(features.len(), records.len());
        assert_eq!(labels.len(), records.len());
        let columns = schema.columns(LABEL_KEY).collect::<Vec<_>>();
        for (i, record) in records.iter().enumerate() {
            assert_eq!(features[i].len(), columns.len());
            for (j, attribute) in columns.iter().enumerate() {
                assert_eq!(
                    Some(&AttributeValue::Number(features[i][j])),
                    record.get(attribute)
                );
            }
            assert_eq!(
                Some(&AttributeValue::Number(f64::from(labels[i]))),
                record.get(LABEL_KEY)
            );
        }
    }

    #[test]
    fn test_bool_values_are_numeric() {
        let records = vec![UserRecord::from_iter([
            ("elite", AttributeValue::Bool(true)),
            (LABEL_KEY, AttributeValue::Bool(false)),
        ])];
        let schema = AttributeSchema::new(["elite"]).unwrap();
        let (features, labels) = vectorize(&records, &schema, LABEL_KEY).unwrap();
        assert_eq!(features, [vec![1.0]]);
        assert_eq!(labels, [0]);
    }

    #[test]
    fn test_missing_schema_attribute() {
        let records = population();
        let schema = AttributeSchema::new(["review_length", "fans"]).unwrap();
        assert_eq!(
            vectorize(&records, &schema, LABEL_KEY).unwrap_err(),
            PipelineError::MissingAttribute {
                attribute: "fans".into(),
                record: 0
            }
        );
    }

    #[test]
    fn test_missing_label() {
        let mut records = population();
        records[4].remove(LABEL_KEY);
        let schema = AttributeSchema::new(["pagerank"]).unwrap();
        assert!(matches!(
            vectorize(&records, &schema, LABEL_KEY),
            Err(PipelineError::MissingAttribute { record: 4, .. })
        ));
    }

    #[test]
    fn test_empty_population() {
        let schema = AttributeSchema::new(["pagerank"]).unwrap();
        let (features, labels) = vectorize(&[], &schema, LABEL_KEY).unwrap();
        assert!(features.is_empty());
        assert!(labels.is_empty());
    }
}
