use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use llmstxt_core::classify::classify;
use llmstxt_core::{
    parse_with, render, validate_source, DiagnosticCode, Document, ParseOptions,
    ValidationLevel, ValidationMode, ValidationResult, ValidatorConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// JSON Schema describing the serialized `ValidationResult`.
const RESULT_SCHEMA_STR: &str = include_str!("../../../docs/validation-result-schema.json");

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "llmstxt.toml";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Propagation mode flag for `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    FailFast,
    CollectAll,
    WarnOnly,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FailFast => ValidationMode::FailFast,
            ModeArg::CollectAll => ValidationMode::CollectAll,
            ModeArg::WarnOnly => ValidationMode::WarnOnly,
        }
    }
}

/// Structural parser and validator for llms.txt files.
#[derive(Parser)]
#[command(name = "llmstxt", version, about = "llms.txt parser and validator")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an llms.txt file and print the document tree and diagnostics
    Parse {
        /// Path to the llms.txt file
        file: PathBuf,
    },

    /// Validate an llms.txt file, optionally with an extended schema
    Validate {
        /// Path to the llms.txt file
        file: PathBuf,
        /// Path to the extended schema JSON file
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Validation level (0-4)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
        level: Option<u8>,
        /// Propagation mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Configuration file (defaults to ./llmstxt.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report whether a file is an Index or a Full document
    Classify {
        /// Path to the llms.txt file
        file: PathBuf,
    },

    /// Print the canonical form of an llms.txt file
    Render {
        /// Path to the llms.txt file
        file: PathBuf,
    },

    /// List the diagnostic code catalog
    Codes,

    /// Print the JSON Schema of the validation result
    Schema,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { file } => {
            cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Validate {
            file,
            schema,
            level,
            mode,
            config,
        } => {
            let config = match load_config(config.as_deref(), level, mode.map(ValidationMode::from)) {
                Ok(c) => c,
                Err(msg) => {
                    report_error(&msg, cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            cmd_validate(&file, schema.as_deref(), &config, cli.output, cli.quiet);
        }
        Commands::Classify { file } => {
            cmd_classify(&file, cli.output, cli.quiet);
        }
        Commands::Render { file } => {
            cmd_render(&file, cli.output, cli.quiet);
        }
        Commands::Codes => {
            cmd_codes(cli.output);
        }
        Commands::Schema => {
            println!("{}", RESULT_SCHEMA_STR.trim_end());
        }
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report an error message to stderr, respecting output format and quiet flag.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Build the validator configuration: file values first, then flags.
fn load_config(
    path: Option<&Path>,
    level: Option<u8>,
    mode: Option<ValidationMode>,
) -> Result<ValidatorConfig, String> {
    let mut config = match path {
        Some(p) => read_config(p)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                read_config(default)?
            } else {
                ValidatorConfig::default()
            }
        }
    };

    if let Some(n) = level {
        config.level = ValidationLevel::try_from(n).map_err(|e| e.to_string())?;
    }
    if let Some(m) = mode {
        config.mode = m;
    }
    tracing::debug!(level = %config.level, mode = %config.mode, "validator configuration");
    Ok(config)
}

fn read_config(path: &Path) -> Result<ValidatorConfig, String> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading config '{}': {}", path.display(), e))?;
    ValidatorConfig::from_toml_str(&src)
        .map_err(|e| format!("error in config '{}': {}", path.display(), e))
}

/// Parse limits from `./llmstxt.toml`, or the defaults.
fn parse_options(output: OutputFormat, quiet: bool) -> ParseOptions {
    match load_config(None, None, None) {
        Ok(c) => c.parse,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn read_source(path: &Path, output: OutputFormat, quiet: bool) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn print_json<T: Serialize>(value: &T, output: OutputFormat, quiet: bool) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            report_error(&format!("error serializing output: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

// ──────────────────────────────────────────────
// Subcommands
// ──────────────────────────────────────────────

fn cmd_parse(path: &Path, output: OutputFormat, quiet: bool) {
    let bytes = read_source(path, output, quiet);
    let options = parse_options(output, quiet);
    let doc = parse_with(&bytes, &options);

    match output {
        OutputFormat::Json => print_json(&doc, output, quiet),
        OutputFormat::Text => print_document(path, &doc, quiet),
    }

    if !doc.is_valid() {
        process::exit(1);
    }
}

fn print_document(path: &Path, doc: &Document, quiet: bool) {
    if !quiet {
        println!(
            "{}: {} document, {} section(s), {} entr{}",
            path.display(),
            doc.document_type,
            doc.sections.len(),
            doc.entry_count(),
            if doc.entry_count() == 1 { "y" } else { "ies" }
        );
        if let Some(title) = &doc.title {
            println!("  title: {}", title);
        }
        for section in &doc.sections {
            let marker = if section.is_optional { " (optional)" } else { "" };
            println!(
                "  ## {}{} [line {}]: {} entr{}",
                section.name,
                marker,
                section.line,
                section.entries.len(),
                if section.entries.len() == 1 { "y" } else { "ies" }
            );
        }
    }
    for d in &doc.diagnostics {
        if quiet && !d.is_error() {
            continue;
        }
        println!("{}:{}", path.display(), d);
    }
}

fn cmd_validate(
    path: &Path,
    schema_path: Option<&Path>,
    config: &ValidatorConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let bytes = read_source(path, output, quiet);
    let schema_src = schema_path.map(|p| match std::fs::read_to_string(p) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading schema '{}': {}", p.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    });

    let result = match validate_source(&bytes, schema_src.as_deref(), config) {
        Ok(r) => r,
        Err(e) => {
            let name = schema_path.map(|p| p.display().to_string()).unwrap_or_default();
            report_error(&format!("error in schema '{}': {}", name, e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => print_json(&result, output, quiet),
        OutputFormat::Text => print_result(path, &result, quiet),
    }

    if !result.is_valid() {
        process::exit(1);
    }
}

fn print_result(path: &Path, result: &ValidationResult, quiet: bool) {
    for issue in &result.errors {
        println!("error: {}", issue.message);
    }
    if !quiet {
        for issue in &result.warnings {
            println!("warning: {}", issue.message);
        }
        let status = if result.is_valid() { "valid" } else { "invalid" };
        println!(
            "{}: {} at {} ({}, {} document): {} error(s), {} warning(s) in {:.2} ms",
            path.display(),
            status,
            result.level,
            result.mode,
            result.document_type,
            result.errors.len(),
            result.warnings.len(),
            result.elapsed_ms
        );
    }
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    document_type: llmstxt_core::DocumentType,
    reason: Option<&'a str>,
    line_count: usize,
    h1_count: usize,
}

fn cmd_classify(path: &Path, output: OutputFormat, quiet: bool) {
    let bytes = read_source(path, output, quiet);
    let options = parse_options(output, quiet);
    let doc = parse_with(&bytes, &options);
    let classification = classify(&doc, &options);

    match output {
        OutputFormat::Json => {
            let report = ClassifyReport {
                document_type: classification.document_type,
                reason: classification.reason.as_deref(),
                line_count: doc.stats.line_count,
                h1_count: doc.stats.h1_count,
            };
            print_json(&report, output, quiet);
        }
        OutputFormat::Text => match &classification.reason {
            Some(reason) if !quiet => {
                println!("{} ({})", classification.document_type, reason)
            }
            _ => println!("{}", classification.document_type),
        },
    }
}

fn cmd_render(path: &Path, output: OutputFormat, quiet: bool) {
    let bytes = read_source(path, output, quiet);
    let doc = parse_with(&bytes, &parse_options(output, quiet));
    if doc.has_code(DiagnosticCode::E001EmptyInput) || doc.title.is_none() {
        report_error(
            &format!("cannot render '{}': no document title", path.display()),
            output,
            quiet,
        );
        process::exit(1);
    }
    let text = render(&doc);
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({ "text": text }), output, quiet),
        OutputFormat::Text => print!("{}", text),
    }
}

#[derive(Serialize)]
struct CodeRow {
    code: DiagnosticCode,
    severity: llmstxt_core::Severity,
    message: &'static str,
    remediation: &'static str,
}

fn cmd_codes(output: OutputFormat) {
    let rows: Vec<CodeRow> = DiagnosticCode::ALL
        .iter()
        .map(|&code| CodeRow {
            code,
            severity: code.severity(),
            message: code.message(),
            remediation: code.remediation(),
        })
        .collect();

    match output {
        OutputFormat::Json => print_json(&rows, output, false),
        OutputFormat::Text => {
            for row in &rows {
                println!("{}  {:<7}  {}", row.code, row.severity.to_string(), row.message);
                println!("        {}", row.remediation);
            }
        }
    }
}
