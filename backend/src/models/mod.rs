//! Domain models for the csvdata pipeline.
//!
//! - [`SchemaNode`] - one node of a loaded JSON schema (object, array or leaf)
//! - [`FlatRow`] - one tabular row keyed by dotted path
//! - [`NestedRecord`] - a row after un-flattening
//! - [`FlattenedSchema`] - dotted path to leaf definition
//! - [`ValidationOutcome`] / [`ValidationReport`] - per-row and aggregate results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One data row: `(dotted path, raw cell)` pairs in column order.
/// Blank cells are never present.
pub type FlatRow = Vec<(String, String)>;

/// A row after un-flattening. Key order follows column order.
pub type NestedRecord = Map<String, Value>;

/// Dotted path to the schema definition it terminates at, in traversal order.
pub type FlattenedSchema = Map<String, Value>;

/// Identifier reported when a record carries no `id`.
pub const UNKNOWN_ID: &str = "unknown";

// =============================================================================
// Schema Node
// =============================================================================

/// Shape of a schema node, as seen by the flattener.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `type: object` with `properties`, in declaration order.
    Object(Vec<(String, SchemaNode)>),
    /// `type: array` with `items`.
    Array(Box<SchemaNode>),
    /// Anything else.
    Leaf,
}

/// A schema node together with its raw JSON definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    pub definition: Value,
}

impl SchemaNode {
    /// Classify a schema definition.
    ///
    /// A node is an object only when it declares both `type: "object"` and a
    /// `properties` map, and an array only when it declares both
    /// `type: "array"` and `items`. Everything else is a leaf.
    pub fn parse(definition: &Value) -> Self {
        let declared = definition.get("type").and_then(Value::as_str);

        let kind = match declared {
            Some("object") => match definition.get("properties").and_then(Value::as_object) {
                Some(properties) => NodeKind::Object(parse_properties(properties)),
                None => NodeKind::Leaf,
            },
            Some("array") => match definition.get("items") {
                Some(items) => NodeKind::Array(Box::new(SchemaNode::parse(items))),
                None => NodeKind::Leaf,
            },
            _ => NodeKind::Leaf,
        };

        Self {
            kind,
            definition: definition.clone(),
        }
    }

    /// Root of a schema document. Its `properties` are walked whatever the
    /// declared root type.
    pub fn root(document: &Value) -> Self {
        let properties = document
            .get("properties")
            .and_then(Value::as_object)
            .map(parse_properties)
            .unwrap_or_default();

        Self {
            kind: NodeKind::Object(properties),
            definition: document.clone(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }
}

fn parse_properties(properties: &Map<String, Value>) -> Vec<(String, SchemaNode)> {
    properties
        .iter()
        .map(|(name, child)| (name.clone(), SchemaNode::parse(child)))
        .collect()
}

// =============================================================================
// Validation results
// =============================================================================

/// Result of transcoding and validating one data row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationOutcome {
    /// 1-based line number in the source, the header being line 1.
    pub row: usize,
    /// Value of the record's `id`, or [`UNKNOWN_ID`].
    pub id: String,
    pub valid: bool,
    /// Validator messages; present iff the row is invalid.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// The nested record that was validated.
    pub data: Value,
}

impl ValidationOutcome {
    pub fn valid(row: usize, id: impl Into<String>, data: Value) -> Self {
        Self {
            row,
            id: id.into(),
            valid: true,
            error: None,
            data,
        }
    }

    pub fn invalid(row: usize, id: impl Into<String>, error: impl Into<String>, data: Value) -> Self {
        Self {
            row,
            id: id.into(),
            valid: false,
            error: Some(error.into()),
            data,
        }
    }
}

/// Aggregate of one validation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Schema the rows were checked against.
    pub schema: String,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Valid rows, in source order.
    pub valid_items: Vec<ValidationOutcome>,
    /// Invalid rows, in source order.
    pub invalid_items: Vec<ValidationOutcome>,
}

impl ValidationReport {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Add an outcome to its bucket. Outcomes must be pushed in row order.
    pub fn push(&mut self, outcome: ValidationOutcome) {
        self.total += 1;
        if outcome.valid {
            self.valid += 1;
            self.valid_items.push(outcome);
        } else {
            self.invalid += 1;
            self.invalid_items.push(outcome);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }
}

/// Display identifier of a record: its top-level `id`, else [`UNKNOWN_ID`].
pub fn record_id(record: &NestedRecord) -> String {
    match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN_ID.to_string(),
        Some(other) => other.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
