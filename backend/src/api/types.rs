//! REST API response types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{FlattenedSchema, ValidationReport};
use crate::report::render_report;

/// Response to `POST /api/validate/{name}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "valid" when every row passed, otherwise "invalid"
    pub status: String,

    /// RFC 3339, UTC
    pub processed_at: String,

    /// Uploaded file name, if the client sent one
    pub file_name: Option<String>,

    pub report: ValidationReport,

    /// Same report in its plain-text form
    pub text: String,
}

impl ValidateResponse {
    pub fn new(report: ValidationReport, file_name: Option<String>) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: if report.is_clean() { "valid" } else { "invalid" }.to_string(),
            processed_at: Utc::now().to_rfc3339(),
            file_name,
            text: render_report(&report),
            report,
        }
    }
}

/// One entry of `GET /api/schemas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub name: String,
    pub field_count: usize,
}

/// Response to `GET /api/schemas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaListResponse {
    pub schema_dir: String,
    pub schemas: Vec<SchemaSummary>,
}

/// Response to `GET /api/schemas/{name}/fields`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsResponse {
    pub schema: String,
    pub fields: FlattenedSchema,
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "processedAt": Utc::now().to_rfc3339(),
        "error": error,
    })
}
