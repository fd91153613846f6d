//! Runtime configuration.
//!
//! [`Settings`] carries the schema directory, the HTTP port and the rule
//! tables used by the flattener and the transcoder. Values come from the
//! environment (a `.env` file is honoured) and can be overridden from the
//! command line.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Schema generation used when nothing else is configured.
pub const DEFAULT_SCHEMA_DIR: &str = "schemas/v1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable overriding the schema directory.
pub const ENV_SCHEMA_DIR: &str = "CSVDATA_SCHEMA_DIR";

/// Environment variable overriding the HTTP port.
pub const ENV_PORT: &str = "CSVDATA_PORT";

/// Environment variable pointing at a JSON rules file.
pub const ENV_RULES: &str = "CSVDATA_RULES";

// =============================================================================
// Rule tables
// =============================================================================

/// Tokens and field-name hints driving cell coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoercionRules {
    /// Case-insensitive tokens read as `true`.
    pub true_tokens: Vec<String>,
    /// Case-insensitive tokens read as `false`.
    pub false_tokens: Vec<String>,
    /// Substrings of a field name marking it as a comma-separated list.
    pub list_indicators: Vec<String>,
}

impl Default for CoercionRules {
    fn default() -> Self {
        Self {
            true_tokens: strings(&["true", "yes", "1"]),
            false_tokens: strings(&["false", "no", "0"]),
            list_indicators: strings(&["tags", "features", "names", "ids"]),
        }
    }
}

impl CoercionRules {
    /// True when `field` contains one of the list indicators (case-insensitive).
    pub fn is_list_field(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.list_indicators
            .iter()
            .any(|indicator| field.contains(&indicator.to_lowercase()))
    }

    /// Boolean reading of `value`, if it is one of the configured tokens.
    pub fn boolean(&self, value: &str) -> Option<bool> {
        if self.true_tokens.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            Some(true)
        } else if self.false_tokens.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            Some(false)
        } else {
            None
        }
    }
}

/// Weekly schedule expansion applied to array-of-leaf fields.
///
/// A field named [`ScheduleRule::field`] is not flattened to one column but to
/// an `opens`/`closes` pair per day, whatever its declared item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRule {
    pub field: String,
    pub days: Vec<String>,
    pub opens: String,
    pub closes: String,
}

impl Default for ScheduleRule {
    fn default() -> Self {
        Self {
            field: "openingHours".to_string(),
            days: strings(&[
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ]),
            opens: "opens".to_string(),
            closes: "closes".to_string(),
        }
    }
}

/// All rule tables, as loaded from a rules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub coercion: CoercionRules,
    pub schedule: ScheduleRule,
}

impl Rules {
    /// Load rules from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read rules file {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid rules file {}: {}", path.display(), e))
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Process settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding one generation of schema documents.
    pub schema_dir: PathBuf,
    /// HTTP port for `serve`.
    pub port: u16,
    /// Flattening and coercion tables.
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
            port: DEFAULT_PORT,
            rules: Rules::default(),
        }
    }
}

impl Settings {
    /// Build settings from the environment, loading `.env` if present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let mut settings = Self::default();

        if let Ok(dir) = env::var(ENV_SCHEMA_DIR) {
            settings.schema_dir = PathBuf::from(dir);
        }

        if let Ok(port) = env::var(ENV_PORT) {
            settings.port = port
                .parse()
                .map_err(|_| format!("{} must be a port number, got '{}'", ENV_PORT, port))?;
        }

        if let Ok(rules) = env::var(ENV_RULES) {
            settings.rules = Rules::from_file(Path::new(&rules))?;
        }

        Ok(settings)
    }

    /// Override the schema directory.
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = dir.into();
        self
    }

    /// Override the rule tables.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
