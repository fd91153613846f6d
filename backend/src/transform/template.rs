//! Schema -> CSV template (header line plus one sample row).

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use super::samples::sample_values;
use crate::config::ScheduleRule;
use crate::error::{CsvResult, SchemaResult};
use crate::parser::{write_rows, write_rows_to};
use crate::schema::{flatten_document, SchemaRegistry};

/// A generated template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub schema: String,
    /// Flattened paths, in schema traversal order.
    pub headers: Vec<String>,
    /// One value per header; empty when no sample is known.
    pub sample_row: HashMap<String, String>,
}

impl Template {
    /// Build the template for already flattened headers.
    pub fn from_headers(schema: &str, headers: Vec<String>) -> Self {
        let samples = sample_values(schema);
        let sample_row = headers
            .iter()
            .map(|h| (h.clone(), samples.get(h).cloned().unwrap_or_default()))
            .collect();

        Self {
            schema: schema.to_string(),
            headers,
            sample_row,
        }
    }

    /// Two-line CSV: headers, then the sample row.
    pub fn to_csv(&self) -> CsvResult<String> {
        write_rows(&self.headers, std::slice::from_ref(&self.sample_row), ',')
    }

    /// Write the CSV form to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> CsvResult<()> {
        write_rows_to(path, &self.headers, std::slice::from_ref(&self.sample_row), ',')
    }
}

/// Generate the template of a named schema.
pub fn generate_template(
    registry: &SchemaRegistry,
    schema_name: &str,
    schedule: &ScheduleRule,
) -> SchemaResult<Template> {
    let document = registry.load(schema_name)?;
    let headers = flatten_document(&document, schedule).keys().cloned().collect();
    Ok(Template::from_headers(schema_name, headers))
}
