use serde_json::Value;

/// Print the headline answer: the verdict and the monthly cash flow.
///
/// Falls back to the first field of the result for envelopes that do not
/// carry a verdict.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "verdict",
        "monthly_cash_flow",
        "cash_on_cash_return_percent",
        "cap_rate_percent",
    ];

    if let Value::Object(map) = result_obj {
        let parts: Vec<String> = priority_keys
            .iter()
            .filter_map(|key| map.get(*key).filter(|v| !v.is_null()))
            .map(format_minimal)
            .collect();
        if !parts.is_empty() {
            println!("{}", parts.join(" "));
            return;
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
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
