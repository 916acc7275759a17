//! Parameter table for run logs.

use serde_json::Value;

use crate::config::RunConfig;

/// Render the run parameters as a two-column table, sorted by key.
///
/// ```text
/// Parameter       Value
/// ----------------------------------
/// Alpha           0.1
/// Edge path       input/edges.csv
/// ```
pub fn parameter_table(config: &RunConfig) -> String {
    let rows = parameter_rows(config);

    let key_width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain(std::iter::once("Parameter".len()))
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .chain(std::iter::once("Value".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<key_width$}   {}\n", "Parameter", "Value");
    out.push_str(&"-".repeat(key_width + 3 + value_width));
    out.push('\n');
    for (key, value) in rows {
        out.push_str(&format!("{key:<key_width$}   {value}\n"));
    }
    out
}

/// `(humanized key, value)` pairs sorted by the raw key.
pub fn parameter_rows(config: &RunConfig) -> Vec<(String, String)> {
    let Ok(Value::Object(fields)) = serde_json::to_value(config) else {
        return Vec::new();
    };

    let mut rows: Vec<(String, String, String)> = fields
        .into_iter()
        .map(|(key, value)| (humanize(&key), render(&value), key))
        .collect();
    rows.sort_by(|a, b| a.2.cmp(&b.2));
    rows.into_iter().map(|(key, value, _)| (key, value)).collect()
}

/// `target_column` → `Target column`.
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
