pub mod csv_out;
pub mod minimal;
pub mod table;

use std::io::{self, Write};

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-printed JSON on stdout, newline terminated.
fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(io::Error::from)
        .and_then(|_| writeln!(out));
    if let Err(e) = written {
        eprintln!("JSON output error: {}", e);
    }
}

/// Arrays of objects inside a result (report rows, advisories, per-month
/// flows, per-competitor totals) that render better as their own table.
pub fn nested_tables(result: &serde_json::Map<String, Value>) -> Vec<(&str, &[Value])> {
    result
        .iter()
        .filter_map(|(key, val)| match val {
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                Some((key.as_str(), items.as_slice()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_tables_pick_object_arrays() {
        let result = json!({
            "rows": [{"label": "Base monthly"}],
            "advisory_lines": ["[good] ok"],
            "advisories": [],
            "total": "1",
        });
        let tables = nested_tables(result.as_object().unwrap());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "rows");
    }
}
