//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render one item in the chosen format.
///
/// Table rendering goes through `to_rows`, which yields key/value (or any
/// other `Tabled`) rows for the detail view.
pub fn render_single<T, R>(
    format: &OutputFormat,
    data: &T,
    to_rows: impl Fn(&T) -> Vec<R>,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => render_table(&to_rows(data)),
        OutputFormat::Json => render_json(data, false)?,
        OutputFormat::JsonCompact => render_json(data, true)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// One-line status message on stderr, e.g. `✓ created version 1.2`.
pub fn status(color: &ColorMode, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    if should_color(color) {
        eprintln!("{} {message}", "✓".green().bold());
    } else {
        eprintln!("✓ {message}");
    }
}

/// A `field | value` row for detail tables.
#[derive(Tabled)]
pub struct DetailRow {
    #[tabled(rename = "Field")]
    pub field: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl DetailRow {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Config {
        message: format!("failed to render JSON: {e}"),
    })
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Config {
        message: format!("failed to render YAML: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Item {
        id: u64,
        download_id: u64,
    }

    fn render(format: &OutputFormat) -> String {
        let item = Item {
            id: 7,
            download_id: 3,
        };
        render_single(
            format,
            &item,
            |i| {
                vec![
                    DetailRow::new("ID", i.id.to_string()),
                    DetailRow::new("Download", i.download_id.to_string()),
                ]
            },
            |i| i.id.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn json_uses_wire_field_names() {
        assert_eq!(render(&OutputFormat::JsonCompact), r#"{"id":7,"downloadId":3}"#);
        let value: serde_json::Value = serde_json::from_str(&render(&OutputFormat::Json)).unwrap();
        assert_eq!(value["downloadId"], 3);
    }

    #[test]
    fn plain_prints_identifier() {
        assert_eq!(render(&OutputFormat::Plain), "7");
    }

    #[test]
    fn table_and_yaml_include_values() {
        let table = render(&OutputFormat::Table);
        assert!(table.contains("Download"));
        assert!(table.contains('3'));

        assert!(render(&OutputFormat::Yaml).contains("downloadId: 3"));
    }
}
