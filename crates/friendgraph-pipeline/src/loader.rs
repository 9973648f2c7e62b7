//! Building populations from processed user files
//!
//! Two input shapes are supported:
//!
//! - **Attribute files**: one JSON object per attribute mapping user IDs to a
//!   number, e.g. `{"u1": 143.5, "u2": 88.0}` for average review lengths.
//!   [`join_attribute_maps`] combines several of them into one record per user.
//! - **Combined user files**: JSON lines, one user object per line.
//!   [`read_users`] keeps the requested scalar attributes of each user.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{self, BufRead, Read},
};

use serde_json::Value;

use crate::record::{AttributeValue, UserRecord};

/// Attribute holding the user's identifier in joined records.
pub const USER_ID_KEY: &str = "user_id";

/// One processed attribute: user ID to value.
pub type AttributeMap = BTreeMap<String, f64>;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to read input")]
    Io(#[error(source)] io::Error),
    #[display("invalid attribute map")]
    AttributeMap(#[error(source)] serde_json::Error),
    #[display("invalid JSON on line {line}")]
    Json { line: usize, source: serde_json::Error },
    #[display("attribute '{attribute}' on line {line} is not a scalar value")]
    NonScalarAttribute { line: usize, attribute: String },
}

/// Reads an attribute file: a JSON object mapping user IDs to numbers.
pub fn read_attribute_map<R>(reader: R) -> Result<AttributeMap, LoadError>
where
    R: Read,
{
    serde_json::from_reader(reader).map_err(LoadError::AttributeMap)
}

/// Joins named attribute maps into one record per user.
///
/// Only users present in every map are kept (an inner join); each record holds
/// [`USER_ID_KEY`] plus one attribute per map. Records are ordered by user ID.
///
/// # Examples
///
/// ```
/// use friendgraph_pipeline::loader::{AttributeMap, join_attribute_maps};
///
/// let lengths = AttributeMap::from([("a".into(), 120.0), ("b".into(), 40.0)]);
/// let tips = AttributeMap::from([("b".into(), 2.0), ("c".into(), 0.0)]);
/// let records = join_attribute_maps(&[("review_length".into(), lengths), ("tips".into(), tips)]);
/// assert_eq!(records.len(), 1);
/// ```
#[must_use]
pub fn join_attribute_maps(maps: &[(String, AttributeMap)]) -> Vec<UserRecord> {
    let Some(((_, first), rest)) = maps.split_first() else {
        return vec![];
    };

    let records = first
        .keys()
        .filter(|user_id| rest.iter().all(|(_, map)| map.contains_key(*user_id)))
        .map(|user_id| {
            let mut record = UserRecord::new();
            record.insert(USER_ID_KEY, user_id.as_str());
            for (name, map) in maps {
                record.insert(name.as_str(), map[user_id]);
            }
            record
        })
        .collect::<Vec<_>>();

    let dropped = count_users(maps) - records.len();
    if dropped > 0 {
        log::warn!("dropped {dropped} users missing from at least one attribute map");
    }
    log::info!(
        "joined {} attribute maps into {} user records",
        maps.len(),
        records.len()
    );
    records
}

/// Number of distinct users across all maps.
fn count_users(maps: &[(String, AttributeMap)]) -> usize {
    maps.iter()
        .flat_map(|(_, map)| map.keys())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Reads a JSON-lines user file, keeping only `attributes` of each user.
///
/// An empty `attributes` list keeps every scalar attribute and silently skips
/// nested ones (friend lists, vote breakdowns). Naming a nested attribute
/// explicitly is an error. Blank lines are skipped.
pub fn read_users<R>(reader: R, attributes: &[String]) -> Result<Vec<UserRecord>, LoadError>
where
    R: BufRead,
{
    let mut records = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(LoadError::Io)?;
        if line.trim().is_empty() {
            continue;
        }
        let mut user: BTreeMap<String, Value> =
            serde_json::from_str(&line).map_err(|source| LoadError::Json {
                line: line_number,
                source,
            })?;

        let mut record = UserRecord::new();
        if attributes.is_empty() {
            for (name, value) in user {
                if let Some(value) = scalar_value(value) {
                    record.insert(name, value);
                }
            }
        } else {
            for name in attributes {
                let Some(value) = user.remove(name) else {
                    continue;
                };
                let value = scalar_value(value).ok_or_else(|| LoadError::NonScalarAttribute {
                    line: line_number,
                    attribute: name.clone(),
                })?;
                record.insert(name.as_str(), value);
            }
        }
        records.push(record);
    }
    log::info!("read {} users", records.len());
    Ok(records)
}

fn scalar_value(value: Value) -> Option<AttributeValue> {
    match value {
        Value::Null => Some(AttributeValue::Null),
        Value::Bool(b) => Some(AttributeValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(AttributeValue::Number),
        Value::String(s) => Some(AttributeValue::Text(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}
