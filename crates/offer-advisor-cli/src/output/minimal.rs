use serde_json::Value;

/// Key answer field per command, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "gross",
    "pre_tax_estimate",
    "implied_bonus",
    "max_package",
    "advisory_lines",
    "advisories",
    "aggregate",
    "total",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(obj) => obj
                    .get("message")
                    .map(format_minimal)
                    .unwrap_or_else(|| item.to_string()),
                other => format_minimal(other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(obj) => obj
            .get("total_package")
            .map(format_minimal)
            .unwrap_or_else(|| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advisories_print_messages() {
        let advisories = json!([
            {"severity": "danger", "code": "cash_decrease", "message": "Cash decreases by 9.4%"},
            {"severity": "warning", "code": "equity_concentration", "message": "Equity is 52% of the package"},
        ]);
        assert_eq!(
            format_minimal(&advisories),
            "Cash decreases by 9.4%\nEquity is 52% of the package"
        );
    }

    #[test]
    fn test_aggregate_prints_total_package() {
        assert_eq!(format_minimal(&json!({"total_package": "474000"})), "474000");
    }
}
