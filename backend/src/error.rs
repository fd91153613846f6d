//! Error types for the csvdata validation pipeline.
//!
//! One enum per layer:
//!
//! - [`CsvError`] - reading and writing delimited text
//! - [`SchemaError`] - schema discovery and loading
//! - [`TransformError`] - row to record transcoding (row-local)
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing tabular data.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to open or read the source.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded with the detected encoding.
    #[error("Failed to decode content as {encoding}")]
    Encoding { encoding: String },

    /// Malformed delimited text.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Serializing rows failed.
    #[error("Failed to write CSV: {0}")]
    Write(String),
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors while resolving or loading a named schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No discovered schema carries this name.
    #[error("Unknown schema: {name}. Available schemas: [{}]", .available.join(", "))]
    UnknownSchema { name: String, available: Vec<String> },

    /// Schema file could not be read.
    #[error("Failed to read schema {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema file is not well-formed JSON.
    #[error("Malformed schema {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Schema document rejected by the validator engine.
    #[error("Invalid schema '{name}': {message}")]
    Invalid { name: String, message: String },
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors while turning one flat row into a nested record.
///
/// These never abort a run: the pipeline records them against the row.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    /// A path is used both as a value and as a nested object.
    #[error("Column '{path}' conflicts with another column: a value and a nested object share the same path")]
    PathConflict { path: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors. All of them are fatal to a run and are raised
/// before any row outcome is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source could not be read or parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Schema could not be resolved or loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for transcoding operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
