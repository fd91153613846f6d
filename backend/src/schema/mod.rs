//! Schema discovery and flattening.
//!
//! A schema directory holds one generation of JSON schema documents
//! (`schemas/v1/event.json`, `schemas/v1/place.json`, ...). The file stem is
//! the schema name. [`SchemaRegistry`] is the explicit handle to one such
//! directory; it is built once and passed to whatever needs schemas.

pub mod flatten;

pub use flatten::{flatten, flatten_document};

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::logs::log_warning;
use crate::error::{SchemaError, SchemaResult};

/// Named schemas of one directory.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Directory the schemas were discovered in
    schema_dir: PathBuf,
    /// name -> file path, sorted by name
    schemas: BTreeMap<String, PathBuf>,
}

impl SchemaRegistry {
    /// Discover every `*.json` file in `dir`.
    ///
    /// A missing or unreadable directory yields an empty registry; resolving a
    /// name against it then fails with the (empty) list of available schemas.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let schema_dir = PathBuf::from(dir.as_ref());
        let mut registry = Self {
            schema_dir,
            schemas: BTreeMap::new(),
        };
        registry.discover();
        registry
    }

    fn discover(&mut self) {
        let entries = match fs::read_dir(&self.schema_dir) {
            Ok(e) => e,
            Err(e) => {
                log_warning(format!(
                    "Schema directory {} not readable: {}",
                    self.schema_dir.display(),
                    e
                ));
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                self.schemas.insert(name.to_string(), path.clone());
            }
        }
    }

    /// Directory this registry was built from.
    pub fn dir(&self) -> &Path {
        &self.schema_dir
    }

    /// All schemas, name -> path.
    pub fn list(&self) -> &BTreeMap<String, PathBuf> {
        &self.schemas
    }

    /// Schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    /// Path of a named schema.
    pub fn resolve(&self, name: &str) -> SchemaResult<&Path> {
        self.schemas
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Read and parse a named schema document.
    pub fn load(&self, name: &str) -> SchemaResult<Value> {
        let path = self.resolve(name)?;

        let content = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SchemaError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}
