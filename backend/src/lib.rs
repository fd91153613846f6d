//! # csvdata - schema-driven CSV templates and validation
//!
//! csvdata derives flat CSV layouts from JSON Schema documents, generates
//! fill-in templates for them, and validates partner-supplied CSV files
//! against the schemas, row by row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transcode  │────▶│  Validate   │
//! │  (UTF8/ISO) │     │  (auto-enc) │     │ (coerce+nest│     │  (report)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                      ┌─────────────┐     ┌─────────────┐
//!                      │ schemas/v1  │────▶│   Flatten   │────▶ template.csv
//!                      └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvdata::{render_report, SchemaRegistry, ValidationPipeline};
//! use std::path::Path;
//!
//! let pipeline = ValidationPipeline::new(SchemaRegistry::with_dir("schemas/v1"));
//!
//! let template = pipeline.template("event")?;
//! template.write_to("event_template.csv")?;
//!
//! let report = pipeline.import_and_validate(Path::new("events.csv"), "event")?;
//! print!("{}", render_report(&report));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Settings and rule tables
//! - [`models`] - Schema nodes, rows, records, outcomes
//! - [`parser`] - CSV reading and writing with auto-detection
//! - [`schema`] - Schema discovery and flattening
//! - [`transform`] - Coercion, nesting, templates and the pipeline
//! - [`validation`] - JSON Schema validation
//! - [`report`] - Plain-text report
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Schemas
pub mod schema;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Reporting
pub mod report;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, CsvResult, PipelineError, PipelineResult, SchemaError, SchemaResult, ServerError,
    TransformError, TransformResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{CoercionRules, Rules, ScheduleRule, Settings};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    record_id, FlatRow, FlattenedSchema, NestedRecord, NodeKind, SchemaNode, ValidationOutcome,
    ValidationReport,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_str, read_rows,
    read_rows_with_delimiter, write_rows, write_rows_to, ParseResult,
};

// =============================================================================
// Re-exports - Schemas
// =============================================================================

pub use schema::{flatten, flatten_document, SchemaRegistry};

// =============================================================================
// Re-exports - Transcoding & Pipeline
// =============================================================================

pub use transform::{
    coerce, generate_template, to_nested, Template, ValidateOptions, ValidationPipeline,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::CompiledSchema;

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::render_report;

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, FieldsResponse, SchemaListResponse, SchemaSummary, ValidateResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
