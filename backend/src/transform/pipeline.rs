//! Validation pipeline: CSV file -> nested records -> schema validation -> report.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvdata::{SchemaRegistry, ValidationPipeline, render_report};
//! use std::path::Path;
//!
//! let pipeline = ValidationPipeline::new(SchemaRegistry::with_dir("schemas/v1"));
//! let report = pipeline.import_and_validate(Path::new("events.csv"), "event")?;
//! println!("{}", render_report(&report));
//! ```
//!
//! Schema resolution, loading and source reading all happen before the first
//! row is looked at; any failure there aborts the run. After that, each row is
//! transcoded and validated on its own: a bad row is reported and the next
//! one is processed.

use serde_json::{Map, Value};
use std::path::Path;

use super::nest::to_nested;
use super::template::{generate_template, Template};
use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::config::Rules;
use crate::error::{PipelineResult, SchemaResult};
use crate::models::{
    record_id, FlatRow, FlattenedSchema, ValidationOutcome, ValidationReport, UNKNOWN_ID,
};
use crate::parser::{parse_bytes_auto, read_rows, read_rows_with_delimiter, ParseResult};
use crate::schema::{flatten_document, SchemaRegistry};
use crate::validation::CompiledSchema;

/// Line number of the first data row (line 1 is the header).
const FIRST_DATA_LINE: usize = 2;

/// Options for one validation run
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Fixed delimiter instead of detection
    pub delimiter: Option<char>,
}

/// Orchestrates schema lookup, transcoding and validation.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    registry: SchemaRegistry,
    rules: Rules,
}

impl ValidationPipeline {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            rules: Rules::default(),
        }
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Validate a CSV file against a named schema.
    pub fn import_and_validate(&self, source: &Path, schema_name: &str) -> PipelineResult<ValidationReport> {
        self.import_and_validate_with(source, schema_name, &ValidateOptions::default())
    }

    /// Same as [`Self::import_and_validate`] with explicit options.
    pub fn import_and_validate_with(
        &self,
        source: &Path,
        schema_name: &str,
        options: &ValidateOptions,
    ) -> PipelineResult<ValidationReport> {
        let schema = self.compile(schema_name)?;

        log_info(format!("📖 Reading {}", source.display()));
        let parsed = match options.delimiter {
            Some(d) => read_rows_with_delimiter(source, d)?,
            None => read_rows(source)?,
        };
        log_parsed(&parsed);

        Ok(self.validate_rows(&schema, &parsed.rows))
    }

    /// Validate uploaded CSV bytes against a named schema.
    pub fn validate_bytes(&self, bytes: &[u8], schema_name: &str) -> PipelineResult<ValidationReport> {
        let schema = self.compile(schema_name)?;

        let parsed = parse_bytes_auto(bytes)?;
        log_parsed(&parsed);

        Ok(self.validate_rows(&schema, &parsed.rows))
    }

    /// Transcode and validate rows, in order.
    pub fn validate_rows(&self, schema: &CompiledSchema, rows: &[FlatRow]) -> ValidationReport {
        log_info(format!("✔️  Validating {} rows against '{}'...", rows.len(), schema.name()));

        let mut report = ValidationReport::new(schema.name());
        for (index, row) in rows.iter().enumerate() {
            report.push(self.validate_row(schema, index + FIRST_DATA_LINE, row));
        }

        if report.is_clean() {
            log_success(format!("All {} rows valid!", report.valid));
        } else {
            log_success(format!("Valid: {}", report.valid));
            log_error(format!("Invalid: {}", report.invalid));
            for item in report.invalid_items.iter().take(3) {
                log_warning(format!(
                    "Row {} ({}): {}",
                    item.row,
                    item.id,
                    item.error.as_deref().unwrap_or_default()
                ));
            }
        }

        report
    }

    fn validate_row(&self, schema: &CompiledSchema, row_number: usize, row: &FlatRow) -> ValidationOutcome {
        let record = match to_nested(row, &self.rules.coercion) {
            Ok(record) => record,
            Err(e) => {
                return ValidationOutcome::invalid(
                    row_number,
                    raw_id(row),
                    e.to_string(),
                    Value::Object(Map::new()),
                )
            }
        };

        let id = record_id(&record);
        let data = Value::Object(record);

        match schema.validate(&data) {
            Ok(()) => ValidationOutcome::valid(row_number, id, data),
            Err(errors) => ValidationOutcome::invalid(row_number, id, errors.join("; "), data),
        }
    }

    /// Resolve, load and compile a named schema.
    pub fn compile(&self, schema_name: &str) -> SchemaResult<CompiledSchema> {
        let document = self.registry.load(schema_name)?;
        CompiledSchema::compile(schema_name, &document)
    }

    /// Flattened columns of a named schema.
    pub fn fields(&self, schema_name: &str) -> SchemaResult<FlattenedSchema> {
        let document = self.registry.load(schema_name)?;
        Ok(flatten_document(&document, &self.rules.schedule))
    }

    /// CSV template of a named schema.
    pub fn template(&self, schema_name: &str) -> SchemaResult<Template> {
        generate_template(&self.registry, schema_name, &self.rules.schedule)
    }
}

fn raw_id(row: &FlatRow) -> String {
    row.iter()
        .rev()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| UNKNOWN_ID.to_string())
}

fn log_parsed(parsed: &ParseResult) {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows, {} columns", parsed.rows.len(), parsed.headers.len()));
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, SchemaError};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const EVENT_SCHEMA: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["sourceId", "id", "nameFr", "descriptionFr", "status"],
        "properties": {
            "sourceId": { "type": "string" },
            "id": { "type": "string" },
            "nameFr": { "type": "string" },
            "descriptionFr": { "type": "string" },
            "status": { "type": "string", "enum": ["Scheduled", "Cancelled"] },
            "address": {
                "type": "object",
                "properties": { "city": { "type": "string" } }
            }
        }
    }"#;

    fn pipeline() -> (TempDir, ValidationPipeline) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("event.json"), EVENT_SCHEMA).unwrap();
        let pipeline = ValidationPipeline::new(SchemaRegistry::with_dir(dir.path()));
        (dir, pipeline)
    }

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_one_valid_one_invalid() {
        let (dir, pipeline) = pipeline();
        let csv = write_csv(
            &dir,
            "sourceId,id,nameFr,descriptionFr,status\n\
             partner123,event123,Valid Event,Valid Description,Scheduled\n\
             partner123,event456,,Invalid Description,InvalidStatus\n",
        );

        let report = pipeline.import_and_validate(&csv, "event").unwrap();
        assert_eq!(report.schema, "event");
        assert_eq!(report.total, 2);
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.valid_items[0].id, "event123");
        assert_eq!(report.valid_items[0].row, 2);
        assert_eq!(report.invalid_items[0].id, "event456");
        assert_eq!(report.invalid_items[0].row, 3);

        let error = report.invalid_items[0].error.as_deref().unwrap();
        assert!(error.contains("nameFr"));
        assert!(error.contains("; "));
        assert_eq!(report.invalid_items[0].data["descriptionFr"], "Invalid Description");
    }

    #[test]
    fn test_unknown_schema_before_reading_source() {
        let (_dir, pipeline) = pipeline();
        let err = pipeline
            .import_and_validate(Path::new("/does/not/exist.csv"), "nonexistent_schema")
            .unwrap_err();

        match err {
            PipelineError::Schema(SchemaError::UnknownSchema { name, available }) => {
                assert_eq!(name, "nonexistent_schema");
                assert_eq!(available, vec!["event"]);
            }
            other => panic!("expected UnknownSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let (dir, pipeline) = pipeline();
        let err = pipeline
            .import_and_validate(&dir.path().join("missing.csv"), "event")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_conflicting_columns_isolated_to_row() {
        let (dir, pipeline) = pipeline();
        let csv = write_csv(
            &dir,
            "sourceId,id,nameFr,descriptionFr,status,address,address.city\n\
             p,event1,N,D,Scheduled,,Montréal\n\
             p,event2,N,D,Scheduled,here,Montréal\n\
             p,event3,N,D,Scheduled,,Laval\n",
        );

        let report = pipeline.import_and_validate(&csv, "event").unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(report.invalid_items[0].row, 3);
        assert_eq!(report.invalid_items[0].id, "event2");
        assert!(report.invalid_items[0].error.as_deref().unwrap().contains("address"));
        assert_eq!(report.valid_items[1].row, 4);
    }

    #[test]
    fn test_empty_source_gives_empty_report() {
        let (dir, pipeline) = pipeline();
        for content in ["", "\n  \n"] {
            let csv = write_csv(&dir, content);

            let report = pipeline.import_and_validate(&csv, "event").unwrap();
            assert_eq!(report.total, 0);
            assert!(report.is_clean());
        }
    }

    #[test]
    fn test_missing_id_is_unknown() {
        let (dir, pipeline) = pipeline();
        let csv = write_csv(&dir, "sourceId,nameFr\npartner123,Nom\n");

        let report = pipeline.import_and_validate(&csv, "event").unwrap();
        assert_eq!(report.invalid_items[0].id, "unknown");
    }

    #[test]
    fn test_semicolon_bytes() {
        let (_dir, pipeline) = pipeline();
        let csv = "sourceId;id;nameFr;descriptionFr;status\np;event1;N;D;Cancelled\n";

        let report = pipeline.validate_bytes(csv.as_bytes(), "event").unwrap();
        assert_eq!(report.valid, 1);
    }

    #[test]
    fn test_fixed_delimiter_option() {
        let (dir, pipeline) = pipeline();
        let csv = write_csv(&dir, "sourceId|id|nameFr|descriptionFr|status\np|event1|N|D|Cancelled\n");
        let options = ValidateOptions { delimiter: Some('|') };

        let report = pipeline.import_and_validate_with(&csv, "event", &options).unwrap();
        assert_eq!(report.valid, 1);
    }

    #[test]
    fn test_fields_and_template() {
        let (_dir, pipeline) = pipeline();
        let fields = pipeline.fields("event").unwrap();
        let template = pipeline.template("event").unwrap();

        assert_eq!(template.headers.len(), fields.len());
        assert!(fields.contains_key("address.city"));
    }
}
