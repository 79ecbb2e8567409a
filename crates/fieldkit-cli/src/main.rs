//! Fieldkit Command-Line Resolver
//!
//! Loads a model document, resolves a group spec against one of its models
//! and prints the resulting descriptors as JSON.

mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fieldkit_core::{json, registry, ContainerConfig, FieldContainer, JsonModelSource, NamedFieldRegistry};
use output::OutputFormat;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fieldkit Command-Line Resolver
#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(version, about = "Resolve group specs against ORM model documents")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Model document (JSON)
    #[arg(long, requires_all = ["model", "spec"])]
    pub models: Option<PathBuf>,

    /// Model the spec is rooted at
    #[arg(long)]
    pub model: Option<String>,

    /// Group spec (JSON)
    #[arg(long)]
    pub spec: Option<PathBuf>,

    /// Container configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the built-in field templates
    Templates {
        /// Output format
        #[arg(long, default_value = "table", value_enum)]
        format: OutputFormat,
    },
}

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fieldkit(#[from] fieldkit_core::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<String, CliError> {
    if let Some(Command::Templates { format }) = args.command {
        let registry = registry::global().read();
        return Ok(output::format_templates(&registry, format)?);
    }

    let (Some(models), Some(model), Some(spec)) = (&args.models, &args.model, &args.spec) else {
        return Err(CliError::Usage(
            "--models, --model and --spec are required (or use `fieldkit templates`)".to_string(),
        ));
    };

    let config = match &args.config {
        Some(path) => ContainerConfig::from_path(path)?,
        None => ContainerConfig::default(),
    };
    let registry = registry::global().read();
    resolve_files(&registry, config, models, model, spec, args.compact)
}

/// Import `models`, resolve the spec in `spec` rooted at `model` and render it.
fn resolve_files(
    registry: &NamedFieldRegistry,
    config: ContainerConfig,
    models: &Path,
    model: &str,
    spec: &Path,
    compact: bool,
) -> Result<String, CliError> {
    let mut container = FieldContainer::with_config(config);
    let names = container.import(JsonModelSource::from_path(models, registry)?)?;
    info!(count = names.len(), path = %models.display(), "loaded models");

    let content = std::fs::read_to_string(spec)?;
    let node = json::parse_node(&serde_json::from_str(&content)?, registry)?;
    let resolved = container.group(model, &node)?;

    Ok(output::format_resolved(&resolved, compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const MODELS: &str = r#"{"models": [{
        "name": "libro",
        "attributes": {
            "id": {"$template": "ID"},
            "titulo": {"type": "STRING", "length": 10}
        }
    }]}"#;

    #[test]
    fn test_resolve_files() {
        let models = write_file(MODELS);
        let spec = write_file(r#"{"titulo": {"$this": {"allowNull": true}}, "limit": {"$template": "LIMIT"}}"#);
        let registry = NamedFieldRegistry::with_builtins();

        let output = resolve_files(
            &registry,
            ContainerConfig::default(),
            models.path(),
            "libro",
            spec.path(),
            true,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["titulo"]["type"], "STRING");
        assert_eq!(json["titulo"]["allowNull"], true);
        assert_eq!(json["limit"]["defaultValue"], 50);
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_resolve_unknown_model() {
        let models = write_file(MODELS);
        let spec = write_file(r#"{"titulo": {"$this": {}}}"#);
        let registry = NamedFieldRegistry::with_builtins();

        let err = resolve_files(
            &registry,
            ContainerConfig::default(),
            models.path(),
            "revista",
            spec.path(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Fieldkit(fieldkit_core::Error::UnknownModel(_))));
    }

    #[test]
    fn test_missing_arguments() {
        let args = Args::parse_from(["fieldkit", "--compact"]);
        assert!(matches!(run(args), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_parse_templates_command() {
        let args = Args::parse_from(["fieldkit", "templates", "--format", "json"]);
        assert!(matches!(
            args.command,
            Some(Command::Templates { format: OutputFormat::Json })
        ));
    }
}
