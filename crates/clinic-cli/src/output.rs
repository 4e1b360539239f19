use clinic_core::{CountSummary, OperationResult, Pagination, Severity};
use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", pretty(value)),
        OutputFormat::Table => print_as_table(value),
    }
}

/// Print a normalized result with a marker coloured by severity.
pub fn print_result(result: &OperationResult) {
    let marker = match result.severity {
        Severity::Success => "✓".green(),
        Severity::Info => "i".cyan(),
        Severity::Warning => "!".yellow(),
        Severity::Error => "✗".red(),
    };
    let line = format!("{marker} {} ({})", result.message, result.status);
    if result.is_error() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_page(pagination: &Pagination) {
    if let (Some(pages), Some(items)) = (pagination.total_pages, pagination.total_items) {
        println!(
            "{} {}/{} ({} items)",
            "Page".cyan(),
            pagination.current_page + 1,
            pages.max(1),
            items
        );
    }
}

pub fn print_count(count: &CountSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_value(count) {
            Ok(value) => println!("{}", pretty(&value)),
            Err(e) => print_error(&format!("Failed to render count: {e}")),
        },
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Metric", "Value"]);
            builder.push_record(["total".to_string(), count.total.to_string()]);
            builder.push_record(["active".to_string(), count.active.to_string()]);
            builder.push_record(["inactive".to_string(), count.inactive().to_string()]);
            for (key, value) in &count.breakdown {
                builder.push_record([key.clone(), value.to_string()]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn print_as_table(value: &Value) {
    match value {
        Value::Array(rows) if rows.is_empty() => println!("No records found."),
        Value::Array(rows) => println!("{}", render_table(rows)),
        Value::Object(_) => println!("{}", render_table(std::slice::from_ref(value))),
        other => println!("{}", pretty(other)),
    }
}

/// One column per scalar field, in first-seen order. Nested values are shown
/// as compact JSON.
fn render_table(rows: &[Value]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        if let Value::Object(fields) = row {
            for key in fields.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| cell(row.get(*c))));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
