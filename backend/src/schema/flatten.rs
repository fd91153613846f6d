//! Schema flattener: nested schema -> dotted path per tabular column.
//!
//! ```text
//! { properties: {                       sourceId
//!     sourceId: string,                 price.currency
//!     price: { currency, minValue },    price.minValue
//!     images: [ { url, altText } ],  →  images.url
//!     categoryTags: [ string ],         images.altText
//!     openingHours: [ string ] } }      categoryTags
//!                                       openingHours.Monday.opens ... (14)
//! ```
//!
//! Traversal is depth-first in property declaration order. Arrays of objects
//! get exactly one column per item property (no per-index columns). Arrays of
//! leaves get a single column holding a comma-joined list, except the weekly
//! schedule field which expands to an `opens`/`closes` pair per day.

use serde_json::{json, Value};

use crate::api::logs::log_warning;
use crate::config::ScheduleRule;
use crate::models::{FlattenedSchema, NodeKind, SchemaNode};

/// Flatten a parsed schema node.
pub fn flatten(root: &SchemaNode, schedule: &ScheduleRule) -> FlattenedSchema {
    let mut flattened = FlattenedSchema::new();
    if let NodeKind::Object(properties) = &root.kind {
        walk_properties(properties, "", schedule, &mut flattened);
    }
    flattened
}

/// Flatten a raw schema document (its root `properties`).
pub fn flatten_document(document: &Value, schedule: &ScheduleRule) -> FlattenedSchema {
    flatten(&SchemaNode::root(document), schedule)
}

fn walk_properties(
    properties: &[(String, SchemaNode)],
    prefix: &str,
    schedule: &ScheduleRule,
    out: &mut FlattenedSchema,
) {
    for (name, node) in properties {
        let path = join(prefix, name);

        match &node.kind {
            NodeKind::Object(children) => walk_properties(children, &path, schedule, out),
            NodeKind::Array(items) => match &items.kind {
                NodeKind::Object(item_properties) => {
                    for (item_name, item_node) in item_properties {
                        insert(out, join(&path, item_name), item_node.definition.clone());
                    }
                }
                _ if *name == schedule.field => expand_schedule(&path, schedule, out),
                _ => insert(out, path, node.definition.clone()),
            },
            NodeKind::Leaf => insert(out, path, node.definition.clone()),
        }
    }
}

fn expand_schedule(path: &str, schedule: &ScheduleRule, out: &mut FlattenedSchema) {
    for day in &schedule.days {
        let day_path = join(path, day);
        insert(out, join(&day_path, &schedule.opens), time_slot());
        insert(out, join(&day_path, &schedule.closes), time_slot());
    }
}

fn time_slot() -> Value {
    json!({ "type": "string", "format": "time" })
}

/// Last write wins; an overwrite is reported as a schema-authoring problem.
fn insert(out: &mut FlattenedSchema, path: String, definition: Value) {
    if out.insert(path.clone(), definition).is_some() {
        log_warning(format!(
            "Schema path '{}' is defined more than once; the last definition wins",
            path
        ));
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
