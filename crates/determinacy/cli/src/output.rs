//! Output formatting for CLI

use crate::error::CliResult;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// One labelled value in a table view.
#[derive(Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    pub fn new(metric: impl Into<String>, value: impl ToString) -> Self {
        Self {
            metric: metric.into(),
            value: value.to_string(),
        }
    }

    pub fn score(metric: impl Into<String>, value: f64) -> Self {
        Self::new(metric, format!("{value:.4}"))
    }
}

/// Print a structured value as JSON or YAML. Returns `false` for table
/// format so the caller can render its own view.
pub fn print_structured<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
            Ok(true)
        }
        OutputFormat::Table => Ok(false),
    }
}

/// Print a titled table of metric rows.
pub fn print_rows(title: &str, rows: Vec<MetricRow>) {
    println!("{}", title.bold().cyan());
    if rows.is_empty() {
        println!("{}", "No results".dimmed());
    } else {
        println!("{}", Table::new(rows));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        let format = OutputFormat::default();
        assert!(matches!(format, OutputFormat::Table));
    }

    #[test]
    fn score_rows_are_rounded() {
        let row = MetricRow::score("consistency", 0.123456);
        assert_eq!(row.value, "0.1235");
    }
}
