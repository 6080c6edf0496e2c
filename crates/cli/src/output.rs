//! Command result rendering.
//!
//! Values are serialized once to JSON and then either pretty-printed or laid
//! out as a plain-text table. The table shape follows the value:
//!
//! - paginated result (`items` + `has_more`): item table plus a next-cursor hint
//! - search result (`matches` + `total`): match table plus the total
//! - any other object: `FIELD`/`VALUE` table in field order
//! - list of objects: one column per field

use serde::Serialize;
use serde_json::{Map, Value};
use slackcli_core::OutputFormat;

use crate::error::CliError;

const EMPTY: &str = "No items found.";

pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
    }
}

fn render_table(value: &Value) -> Result<String, CliError> {
    match value {
        Value::Object(map) => {
            if let (Some(Value::Array(items)), Some(Value::Bool(has_more))) =
                (map.get("items"), map.get("has_more"))
            {
                let mut out = list_table(items)?;
                if *has_more {
                    let cursor = map.get("next_cursor").and_then(Value::as_str).unwrap_or_default();
                    out.push_str(&format!("\n\nMore results available. Next cursor: {cursor}"));
                }
                return Ok(out);
            }

            if let (Some(Value::Array(matches)), Some(total)) = (map.get("matches"), map.get("total")) {
                let mut out = list_table(matches)?;
                out.push_str(&format!("\n\nTotal: {}", cell(total)));
                return Ok(out);
            }

            Ok(key_value_table(map))
        }
        Value::Array(items) => list_table(items),
        other => Ok(serde_json::to_string_pretty(other)?),
    }
}

fn key_value_table(map: &Map<String, Value>) -> String {
    let rows = map.iter().map(|(key, value)| vec![key.clone(), cell(value)]).collect();
    layout(vec!["FIELD".to_string(), "VALUE".to_string()], rows)
}

fn list_table(items: &[Value]) -> Result<String, CliError> {
    if items.is_empty() {
        return Ok(EMPTY.to_string());
    }
    if !items.iter().all(Value::is_object) {
        return Ok(serde_json::to_string_pretty(items)?);
    }

    // Fields skipped during serialization still get a column.
    let mut columns: Vec<&str> = Vec::new();
    for item in items.iter().filter_map(Value::as_object) {
        for key in item.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let headers = columns.iter().map(|column| column.to_ascii_uppercase()).collect();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| columns.iter().map(|column| item.get(*column).map(cell).unwrap_or_default()).collect())
        .collect();
    Ok(layout(headers, rows))
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.replace('\n', " "),
        Value::Array(values) => values.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}

fn layout(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (index, value) in row.iter().enumerate() {
            widths[index] = widths[index].max(value.chars().count());
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| format!("{value:<width$}", width = widths[index]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let mut lines = vec![line(&headers), line(&separator)];
    lines.extend(rows.iter().map(|row| line(row)));
    lines.join("\n")
}
