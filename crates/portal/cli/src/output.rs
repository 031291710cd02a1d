//! Terminal output helpers

use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).to_string()
}

/// Print a list of rows in the selected format. An empty table prints a
/// dimmed placeholder instead of bare headers.
pub fn print_output<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "Aucun résultat".dimmed());
            } else {
                println!("{}", render_table(rows));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).unwrap());
        }
    }
}

/// Print a single item as pretty JSON
pub fn print_single<T: Serialize>(data: &T) {
    println!("{}", serde_json::to_string_pretty(data).unwrap());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        code: String,
        libelle: String,
    }

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn test_table_rendering_includes_headers_and_cells() {
        let rows = vec![Row {
            code: "INFO".into(),
            libelle: "Informatique".into(),
        }];
        let table = render_table(&rows);
        assert!(table.contains("code"));
        assert!(table.contains("libelle"));
        assert!(table.contains("Informatique"));
    }
}
