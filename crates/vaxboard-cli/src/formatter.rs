//! Output formatters for reports.

use clap::ValueEnum;
use comfy_table::{Cell, CellAlignment, Table};
use vaxboard_core::{AggregateTable, Value};

/// Output format for results.
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

/// One block of a report.
#[derive(Debug, Clone)]
pub enum Section {
    /// Named scalar indicators.
    Summary {
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// A derived table.
    Table(AggregateTable),
    /// A list of choices.
    List { name: String, values: Vec<String> },
}

impl Section {
    /// Section name, used as a title or JSON key.
    pub fn name(&self) -> &str {
        match self {
            Section::Summary { name, .. } | Section::List { name, .. } => name,
            Section::Table(table) => &table.name,
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a single section.
    fn format_section(&self, section: &Section) -> String;

    /// Format a whole report.
    fn format_report(&self, sections: &[Section]) -> String {
        sections
            .iter()
            .map(|s| self.format_section(s))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_section(&self, section: &Section) -> String {
        let mut table = Table::new();
        let rows = match section {
            Section::Summary { fields, .. } => {
                table.set_header(vec!["Indicator", "Value"]);
                for (name, value) in fields {
                    table.add_row(vec![Cell::new(name), value_cell(value)]);
                }
                fields.len()
            }
            Section::Table(aggregate) => {
                table.set_header(aggregate.columns().iter().map(Cell::new));
                for row in aggregate.rows() {
                    table.add_row(row.iter().map(value_cell));
                }
                aggregate.len()
            }
            Section::List { values, .. } => {
                table.set_header(vec!["Value"]);
                for value in values {
                    table.add_row(vec![value]);
                }
                values.len()
            }
        };

        if rows == 0 {
            return format!("{}\nNo results", section.name());
        }
        format!("{}\n{}\n{} row(s)", section.name(), table, rows)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl JsonFormatter {
    fn section_to_json(section: &Section) -> serde_json::Value {
        match section {
            Section::Summary { fields, .. } => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value_to_json(value)))
                    .collect(),
            ),
            Section::Table(aggregate) => serde_json::Value::Array(
                aggregate
                    .rows()
                    .iter()
                    .map(|row| {
                        serde_json::Value::Object(
                            aggregate
                                .columns()
                                .iter()
                                .zip(row)
                                .map(|(column, value)| (column.clone(), value_to_json(value)))
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            Section::List { values, .. } => serde_json::Value::Array(
                values
                    .iter()
                    .map(|v| serde_json::Value::String(v.clone()))
                    .collect(),
            ),
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_section(&self, section: &Section) -> String {
        serde_json::to_string_pretty(&Self::section_to_json(section))
            .unwrap_or_else(|_| "null".to_string())
    }

    fn format_report(&self, sections: &[Section]) -> String {
        let obj: serde_json::Map<String, serde_json::Value> = sections
            .iter()
            .map(|s| (s.name().to_string(), Self::section_to_json(s)))
            .collect();
        serde_json::to_string_pretty(&serde_json::Value::Object(obj))
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({
            "error": error
        })
        .to_string()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}

/// Render an integer with `.` as the thousands separator: `1234567` becomes
/// `1.234.567`.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format a Value as a table cell.
fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::new("-"),
        Value::Int64(i) => Cell::new(format_count(*i)).set_alignment(CellAlignment::Right),
        Value::Float64(f) => Cell::new(format!("{:.2}", f)).set_alignment(CellAlignment::Right),
        Value::Text(s) => Cell::new(s),
        Value::Date(d) => Cell::new(d.format("%d/%m/%Y")),
    }
}

/// Convert a Value to JSON.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Int64(i) => serde_json::Value::Number((*i).into()),
        Value::Float64(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AggregateTable {
        let mut table = AggregateTable::new("top_vaccine_name", ["vaccine_name", "count"]);
        table.table.push_row(vec![Value::from("BCG"), Value::Int64(12_345)]);
        table.table.push_row(vec![Value::from("Penta"), Value::Null]);
        table
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.000");
        assert_eq!(format_count(1_234_567), "1.234.567");
        assert_eq!(format_count(-45_000), "-45.000");
    }

    #[test]
    fn test_table_format() {
        let output = TableFormatter.format_section(&Section::Table(sample()));
        assert!(output.starts_with("top_vaccine_name"));
        assert!(output.contains("vaccine_name"));
        assert!(output.contains("12.345"));
        assert!(output.ends_with("2 row(s)"));
    }

    #[test]
    fn test_table_format_empty() {
        let section = Section::List {
            name: "municipalities".into(),
            values: vec![],
        };
        assert_eq!(TableFormatter.format_section(&section), "municipalities\nNo results");
    }

    #[test]
    fn test_json_report() {
        let sections = vec![
            Section::Summary {
                name: "kpis".into(),
                fields: vec![("total_doses".into(), Value::Int64(3))],
            },
            Section::Table(sample()),
        ];
        let output = JsonFormatter.format_report(&sections);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["kpis"]["total_doses"], 3);
        assert_eq!(parsed["top_vaccine_name"][0]["vaccine_name"], "BCG");
        assert!(parsed["top_vaccine_name"][1]["count"].is_null());
    }

    #[test]
    fn test_json_error() {
        let output = JsonFormatter.format_error("boom");
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["error"], "boom");
    }
}
