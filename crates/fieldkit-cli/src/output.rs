//! Output formatting for resolved specs and template listings.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use fieldkit_core::{NamedFieldRegistry, ResolvedNode};

/// Output format for template listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a resolved spec as JSON.
pub fn format_resolved(resolved: &ResolvedNode, compact: bool) -> Result<String, serde_json::Error> {
    if compact {
        serde_json::to_string(resolved)
    } else {
        serde_json::to_string_pretty(resolved)
    }
}

/// Render every template of `registry`.
pub fn format_templates(
    registry: &NamedFieldRegistry,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => Ok(templates_table(registry)),
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            for name in registry.names() {
                if let Some(template) = registry.get(name) {
                    map.insert(name.to_string(), serde_json::to_value(template)?);
                }
            }
            serde_json::to_string_pretty(&serde_json::Value::Object(map))
        }
    }
}

fn templates_table(registry: &NamedFieldRegistry) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Type", "Comment"]);

    for name in registry.names() {
        let Some(template) = registry.get(name) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(template.kind.to_string()),
            Cell::new(template.comment.as_deref().unwrap_or("")),
        ]);
    }

    format!("{table}\n({} templates)", registry.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_table() {
        let registry = NamedFieldRegistry::with_builtins();
        let output = format_templates(&registry, OutputFormat::Table).unwrap();
        assert!(output.contains("USERNAME"));
        assert!(output.contains("STRING(100)"));
        assert!(output.contains(&format!("({} templates)", registry.len())));
    }

    #[test]
    fn test_templates_json() {
        let registry = NamedFieldRegistry::with_builtins();
        let output = format_templates(&registry, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["ID"]["primaryKey"], true);
        assert_eq!(json["_STATUS"]["type"], "ENUM");
    }
}
