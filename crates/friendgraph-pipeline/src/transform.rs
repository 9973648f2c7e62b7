//! In-place attribute rewrites on a population
//!
//! These operations mutate the given records and return nothing. They are the
//! first stage of the pipeline: drop attributes that must not leak into the
//! features, binarize count-like attributes, and move the target attribute
//! under [`LABEL_KEY`](crate::record::LABEL_KEY).

use crate::{
    PipelineError,
    record::{AttributeValue, LABEL_KEY, UserRecord},
};

/// Replaces `attribute` with 1 if its value is truthy and 0 otherwise.
///
/// Applying it twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::{record::{AttributeValue, UserRecord}, transform};
///
/// let mut records = vec![
///     UserRecord::from_iter([("tips", 4.0)]),
///     UserRecord::from_iter([("tips", 0.0)]),
/// ];
/// transform::binarize(&mut records, "tips").unwrap();
/// assert_eq!(records[0].get("tips"), Some(&AttributeValue::Number(1.0)));
/// assert_eq!(records[1].get("tips"), Some(&AttributeValue::Number(0.0)));
/// ```
pub fn binarize(records: &mut [UserRecord], attribute: &str) -> Result<(), PipelineError> {
    require_everywhere(records, attribute)?;
    for record in records.iter_mut() {
        let truthy = record.get(attribute).is_some_and(AttributeValue::is_truthy);
        record.insert(attribute, u32::from(truthy));
    }
    log::debug!("binarized '{attribute}' on {} records", records.len());
    Ok(())
}

/// Moves `attribute` under `label_key` on every record.
///
/// `label_key` is normally [`LABEL_KEY`]. The original attribute no longer
/// exists afterwards. If any record lacks `attribute`, nothing is changed.
pub fn designate_label(
    records: &mut [UserRecord],
    attribute: &str,
    label_key: &str,
) -> Result<(), PipelineError> {
    require_everywhere(records, attribute)?;
    for record in records.iter_mut() {
        if let Some(value) = record.remove(attribute) {
            record.insert(label_key, value);
        }
    }
    log::debug!(
        "designated '{attribute}' as '{label_key}' on {} records",
        records.len()
    );
    Ok(())
}

/// Removes `attribute` from every record that has it.
pub fn remove_attribute(records: &mut [UserRecord], attribute: &str) {
    let removed = records
        .iter_mut()
        .filter_map(|record| record.remove(attribute))
        .count();
    log::debug!("removed '{attribute}' from {removed} records");
}

fn require_everywhere(records: &[UserRecord], attribute: &str) -> Result<(), PipelineError> {
    for (index, record) in records.iter().enumerate() {
        record.require(attribute, index)?;
    }
    Ok(())
}
