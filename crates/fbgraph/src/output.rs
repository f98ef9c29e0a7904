//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of items in the chosen format.
///
/// - `table`: one `Tabled` row per item
/// - `json` / `json-compact` / `yaml`: the items via serde
/// - `plain`: `id_fn` per item, one per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Table mode uses `detail_fn` since detail views
/// are key/value listings rather than rows.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

// ── Untyped Graph values ─────────────────────────────────────────────

/// Key/value detail view of a JSON object, nested values inlined compactly.
pub fn value_detail(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            map.iter()
                .map(|(k, v)| format!("{k:<width$}  {}", scalar(v)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => scalar(other),
    }
}

/// A JSON value rendered for a table cell: strings unquoted, the rest compact.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The `id` field of an untyped Graph object, or an empty string.
pub fn value_id(value: &Value) -> String {
    value.get("id").map(scalar).unwrap_or_default()
}

/// Generic row for connection listings of unknown shape.
#[derive(Tabled)]
pub struct ValueRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Other fields")]
    pub other: String,
}

impl From<&Value> for ValueRow {
    fn from(value: &Value) -> Self {
        let field = |key: &str| value.get(key).map(scalar).unwrap_or_default();
        let other = value
            .as_object()
            .map(|m| {
                m.keys()
                    .filter(|k| *k != "id" && *k != "name" && *k != "message")
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        Self {
            id: field("id"),
            name: value
                .get("name")
                .or_else(|| value.get("message"))
                .map(scalar)
                .unwrap_or_default(),
            other,
        }
    }
}

/// Shorten free text for a table cell.
pub fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == text.len() {
        return line.to_owned();
    }
    let cut: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_lists_ids() {
        let data = vec![json!({"id": "1"}), json!({"id": 2})];
        let out = render_list(OutputFormat::Plain, &data, |v| ValueRow::from(v), value_id).unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(OutputFormat::JsonCompact, &json!({"id": "4"}), value_detail, value_id)
            .unwrap();
        assert_eq!(out, r#"{"id":"4"}"#);
    }

    #[test]
    fn detail_aligns_keys() {
        let out = value_detail(&json!({"id": "4", "name": "Zuck", "likes": {"data": []}}));
        assert!(out.contains("id     4"));
        assert!(out.contains(r#"likes  {"data":[]}"#));
    }

    #[test]
    fn table_row_uses_message_when_nameless() {
        let row = ValueRow::from(&json!({"id": "1_2", "message": "hi", "created_time": "x"}));
        assert_eq!(row.name, "hi");
        assert_eq!(row.other, "created_time");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("first\nsecond", 20), "first…");
    }
}
