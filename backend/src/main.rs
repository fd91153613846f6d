//! csvdata CLI - CSV templates and validation against JSON schemas
//!
//! # Main Commands
//!
//! ```bash
//! csvdata template event                    # Write event_template.csv
//! csvdata validate events.csv --schema event
//! csvdata serve                             # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! csvdata schemas                           # List discovered schemas
//! csvdata fields place                      # Show flattened column paths
//! csvdata parse events.csv                  # Rows as nested JSON records
//! ```
//!
//! Diagnostics go to stderr; reports, templates and JSON go to stdout (or
//! the `--output` file).

use clap::{Parser, Subcommand};
use csvdata::{
    read_rows, read_rows_with_delimiter, render_report, to_nested, Rules, SchemaRegistry,
    Settings, ValidateOptions, ValidationPipeline,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvdata")]
#[command(about = "Generate CSV templates from JSON schemas and validate CSV files against them", long_about = None)]
struct Cli {
    /// Schema directory (overrides CSVDATA_SCHEMA_DIR)
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    /// JSON rules file (overrides CSVDATA_RULES)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available schemas
    Schemas,

    /// Show the flattened column paths of a schema
    Fields {
        /// Schema name
        schema: String,

        /// Print path -> definition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a CSV template for a schema
    Template {
        /// Schema name
        schema: String,

        /// Output file (default: <schema>_template.csv, "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output nested JSON records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a CSV file against a schema
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// Schema name
        #[arg(short, long)]
        schema: String,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides CSVDATA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match load_settings(cli.schema_dir, cli.rules) {
        Ok(settings) => run(cli.command, settings).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Environment first, then CLI flags.
fn load_settings(
    schema_dir: Option<PathBuf>,
    rules: Option<PathBuf>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::from_env()?;

    if let Some(dir) = schema_dir {
        settings = settings.with_schema_dir(dir);
    }
    if let Some(path) = rules {
        settings = settings.with_rules(Rules::from_file(&path)?);
    }

    Ok(settings)
}

/// Returns `Ok(false)` when the command ran but found invalid rows.
async fn run(command: Commands, settings: Settings) -> Result<bool, Box<dyn std::error::Error>> {
    let pipeline = ValidationPipeline::new(SchemaRegistry::with_dir(&settings.schema_dir))
        .with_rules(settings.rules.clone());

    match command {
        Commands::Schemas => cmd_schemas(&pipeline)?,

        Commands::Fields { schema, json } => cmd_fields(&pipeline, &schema, json)?,

        Commands::Template { schema, output } => cmd_template(&pipeline, &schema, output.as_deref())?,

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&pipeline, &input, delimiter, output.as_deref())?,

        Commands::Validate {
            input,
            schema,
            delimiter,
            json,
            output,
        } => return cmd_validate(&pipeline, &input, &schema, delimiter, json, output.as_deref()),

        Commands::Serve { port } => cmd_serve(settings, port).await?,
    }

    Ok(true)
}

fn cmd_schemas(pipeline: &ValidationPipeline) -> Result<(), Box<dyn std::error::Error>> {
    let registry = pipeline.registry();

    if registry.list().is_empty() {
        eprintln!("📋 No schemas found in {}", registry.dir().display());
        return Ok(());
    }

    eprintln!("📋 Schemas in {} ({}):", registry.dir().display(), registry.list().len());
    for (name, path) in registry.list() {
        println!("{}\t{}", name, path.display());
    }

    Ok(())
}

fn cmd_fields(pipeline: &ValidationPipeline, schema: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let fields = pipeline.fields(schema)?;
    eprintln!("📐 {} flattened fields in '{}'", fields.len(), schema);

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        for path in fields.keys() {
            println!("{}", path);
        }
    }

    Ok(())
}

fn cmd_template(
    pipeline: &ValidationPipeline,
    schema: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = pipeline.template(schema)?;
    eprintln!("📝 Template for '{}': {} columns", schema, template.headers.len());

    match output {
        Some(p) if p == Path::new("-") => print!("{}", template.to_csv()?),
        Some(p) => {
            template.write_to(p)?;
            eprintln!("💾 Template written to: {}", p.display());
        }
        None => {
            let path = PathBuf::from(format!("{}_template.csv", schema));
            template.write_to(&path)?;
            eprintln!("💾 Template written to: {}", path.display());
        }
    }

    Ok(())
}

fn cmd_parse(
    pipeline: &ValidationPipeline,
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = match delimiter {
        Some(d) => read_rows_with_delimiter(input, d)?,
        None => read_rows(input)?,
    };

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));

    let mut records = Vec::with_capacity(result.rows.len());
    for (index, row) in result.rows.iter().enumerate() {
        match to_nested(row, &pipeline.rules().coercion) {
            Ok(record) => records.push(Value::Object(record)),
            Err(e) => {
                eprintln!("   ⚠️  Row {}: {}", index + 2, e);
                records.push(Value::Null);
            }
        }
    }
    eprintln!("✅ Parsed {} records", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(
    pipeline: &ValidationPipeline,
    input: &Path,
    schema: &str,
    delimiter: Option<char>,
    json: bool,
    output: Option<&Path>,
) -> Result<bool, Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {} against '{}'", input.display(), schema);

    let options = ValidateOptions { delimiter };
    let report = pipeline.import_and_validate_with(input, schema, &options)?;

    let content = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_report(&report)
    };
    write_output(&content, output)?;

    Ok(report.is_clean())
}

async fn cmd_serve(settings: Settings, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match port {
        Some(port) => Settings { port, ..settings },
        None => settings,
    };
    csvdata::server::start_server(settings).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
