//! Row -> record: un-flatten dotted columns into nested objects.
//!
//! ```text
//! address.city = Montréal     →   { "address": { "city": "Montréal",
//! address.geo.lat = 45.5      →                  "geo": { "lat": 45.5 } } }
//! ```

use serde_json::{Map, Value};

use super::coerce::coerce;
use crate::config::CoercionRules;
use crate::error::{TransformError, TransformResult};
use crate::models::{FlatRow, NestedRecord};

/// Un-flatten one row.
///
/// Intermediate objects are created on first use; the leaf value is coerced
/// with the last path segment as field name and replaces whatever was there,
/// nested object included. A column that would descend into an existing
/// non-object value is a [`TransformError::PathConflict`].
pub fn to_nested(row: &FlatRow, rules: &CoercionRules) -> TransformResult<NestedRecord> {
    let mut record = NestedRecord::new();

    for (path, raw) in row {
        let mut segments: Vec<&str> = path.split('.').collect();
        // split always yields at least one segment
        let field = segments.pop().unwrap_or_default();

        let mut current = &mut record;
        for (depth, segment) in segments.iter().enumerate() {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));

            current = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(TransformError::PathConflict {
                        path: segments[..=depth].join("."),
                    })
                }
            };
        }

        current.insert(field.to_string(), coerce(raw, field, rules));
    }

    Ok(record)
}
