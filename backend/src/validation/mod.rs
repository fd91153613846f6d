//! JSON Schema validation of nested records.
//!
//! The schema engine itself is the `jsonschema` crate (draft 7). This module
//! only adapts it to the pipeline: messages come back as opaque strings.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use csvdata::validation::CompiledSchema;
//!
//! let schema = CompiledSchema::compile("event", &json!({
//!     "type": "object",
//!     "required": ["id"],
//!     "properties": { "id": { "type": "string" } }
//! }))?;
//!
//! assert!(schema.validate(&json!({ "id": "event123" })).is_ok());
//! assert!(schema.validate(&json!({})).is_err());
//! ```

use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};

/// A schema compiled once and applied to every row of a run.
pub struct CompiledSchema {
    name: String,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    /// Compile a schema document.
    pub fn compile(name: &str, schema: &Value) -> SchemaResult<Self> {
        let validator = jsonschema::draft7::new(schema).map_err(|e| SchemaError::Invalid {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            validator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate one record.
    ///
    /// # Returns
    /// * `Ok(())` if valid
    /// * `Err(Vec<String>)` with one message per violation
    pub fn validate(&self, data: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(data)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_schema() -> Value {
        json!({
            "type": "object",
            "required": ["sourceId", "id", "nameFr", "descriptionFr", "status"],
            "properties": {
                "sourceId": { "type": "string" },
                "id": { "type": "string" },
                "nameFr": { "type": "string" },
                "descriptionFr": { "type": "string" },
                "status": { "type": "string", "enum": ["Scheduled", "Cancelled"] }
            }
        })
    }

    #[test]
    fn test_valid_record() {
        let event = json!({
            "sourceId": "partner123",
            "id": "event123",
            "nameFr": "Test Event",
            "descriptionFr": "Test Description",
            "status": "Scheduled"
        });
        let schema = CompiledSchema::compile("event", &event_schema()).unwrap();
        assert!(schema.validate(&event).is_ok());
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let event = json!({
            "sourceId": "partner123",
            "nameFr": "Test Event",
            "descriptionFr": "Test Description",
            "status": "Scheduled"
        });
        let schema = CompiledSchema::compile("event", &event_schema()).unwrap();
        let errors = schema.validate(&event).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("id"));
    }

    #[test]
    fn test_compiled_schema_reports_every_violation() {
        let schema = CompiledSchema::compile("event", &event_schema()).unwrap();
        assert_eq!(schema.name(), "event");

        let event = json!({
            "sourceId": "partner123",
            "id": "event456",
            "descriptionFr": "Invalid Description",
            "status": "InvalidStatus"
        });
        let errors = schema.validate(&event).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("InvalidStatus")));
    }

    #[test]
    fn test_invalid_schema_document() {
        let broken = json!({ "type": "not-a-type" });
        let err = CompiledSchema::compile("broken", &broken).err().unwrap();
        assert!(matches!(err, SchemaError::Invalid { .. }));
    }
}
