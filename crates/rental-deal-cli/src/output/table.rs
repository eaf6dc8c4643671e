use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Print the evaluation as two tables: assumptions, then metrics.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };

    if let Some(Value::Object(assumptions)) = envelope.get("assumptions") {
        println!("{}", field_table("Assumption", assumptions));
    }

    match envelope.get("result") {
        Some(Value::Object(result)) => println!("\n{}", field_table("Metric", result)),
        _ => println!("{}", field_table("Field", envelope)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(saved_at)) = envelope.get("saved_at") {
        println!("\nInputs saved at: {}", saved_at);
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn field_table(header: &str, map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record([header, "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    builder.build()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
