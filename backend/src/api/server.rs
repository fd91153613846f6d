//! HTTP server for the csvdata API.
//!
//! # API Endpoints
//!
//! | Method | Path                           | Description                          |
//! |--------|--------------------------------|--------------------------------------|
//! | GET    | `/health`                      | Health check                         |
//! | GET    | `/api/schemas`                 | Available schemas                    |
//! | GET    | `/api/schemas/{name}/fields`   | Flattened column paths               |
//! | GET    | `/api/schemas/{name}/template` | CSV template                         |
//! | POST   | `/api/validate/{name}`         | Validate an uploaded CSV (`file`)    |
//! | GET    | `/api/logs`                    | SSE stream for real-time logs        |
//!
//! The schema directory is re-scanned on every request, so schemas dropped
//! into it are picked up without a restart.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, FieldsResponse, SchemaListResponse, SchemaSummary, ValidateResponse};
use crate::config::Settings;
use crate::error::{PipelineError, SchemaError, ServerError, ServerResult};
use crate::schema::SchemaRegistry;
use crate::transform::ValidationPipeline;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn pipeline(&self) -> ValidationPipeline {
        ValidationPipeline::new(SchemaRegistry::with_dir(&self.settings.schema_dir))
            .with_rules(self.settings.rules.clone())
    }
}

type Rejection = (StatusCode, Json<Value>);

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/schemas", get(list_schemas))
        .route("/api/schemas/{name}/fields", get(schema_fields))
        .route("/api/schemas/{name}/template", get(schema_template))
        .route("/api/validate/{name}", post(validate_csv))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn start_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let port = settings.port;
    let schema_dir = settings.schema_dir.display().to_string();
    let app = router(AppState::new(settings));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 csvdata server running on http://localhost:{}", port);
    eprintln!("   Schemas: {}", schema_dir);
    eprintln!("   GET  /api/schemas                 - List schemas");
    eprintln!("   GET  /api/schemas/{{name}}/fields   - Flattened fields");
    eprintln!("   GET  /api/schemas/{{name}}/template - CSV template");
    eprintln!("   POST /api/validate/{{name}}         - Validate CSV upload");
    eprintln!("   GET  /api/logs                    - SSE log stream");
    eprintln!("   GET  /health                      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for a server error
fn status_for(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Pipeline(PipelineError::Schema(SchemaError::UnknownSchema { .. })) => StatusCode::NOT_FOUND,
        ServerError::Pipeline(PipelineError::Csv(_)) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::Schema(_)) | ServerError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn reject(err: ServerError) -> Rejection {
    let status = status_for(&err);
    if status.is_server_error() {
        log_error(err.to_string());
    }
    (status, Json(error_response(&err.to_string())))
}

fn schema_error(err: SchemaError) -> ServerError {
    ServerError::Pipeline(err.into())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "csvdata",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "schemas": "GET /api/schemas",
            "validate": "POST /api/validate/{name}",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn list_schemas(State(state): State<Arc<AppState>>) -> Result<Json<SchemaListResponse>, Rejection> {
    let pipeline = state.pipeline();

    let schemas = pipeline
        .registry()
        .names()
        .into_iter()
        .map(|name| {
            let fields = pipeline.fields(&name).map_err(schema_error)?;
            Ok(SchemaSummary {
                name,
                field_count: fields.len(),
            })
        })
        .collect::<ServerResult<Vec<_>>>()
        .map_err(reject)?;

    Ok(Json(SchemaListResponse {
        schema_dir: pipeline.registry().dir().display().to_string(),
        schemas,
    }))
}

async fn schema_fields(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FieldsResponse>, Rejection> {
    let fields = state
        .pipeline()
        .fields(&name)
        .map_err(|e| reject(schema_error(e)))?;

    Ok(Json(FieldsResponse { schema: name, fields }))
}

async fn schema_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let template = state
        .pipeline()
        .template(&name)
        .map_err(|e| reject(schema_error(e)))?;
    let csv = template
        .to_csv()
        .map_err(|e| reject(ServerError::Internal(e.to_string())))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_template.csv\"", name),
            ),
        ],
        csv,
    ))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Validate an uploaded CSV against a named schema
async fn validate_csv(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ValidateResponse>, Rejection> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| reject(ServerError::BadRequest(format!("Read error: {}", e))))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| reject(ServerError::BadRequest("No file provided".into())))?;

    validate_upload(&state, &name, &bytes, file_name)
        .map(Json)
        .map_err(reject)
}

/// Run the pipeline over uploaded bytes
fn validate_upload(
    state: &AppState,
    schema_name: &str,
    bytes: &[u8],
    file_name: Option<String>,
) -> ServerResult<ValidateResponse> {
    log_info(format!(
        "📄 Upload: {} ({} bytes) -> {}",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len(),
        schema_name
    ));

    let report = state.pipeline().validate_bytes(bytes, schema_name)?;
    Ok(ValidateResponse::new(report, file_name))
}
