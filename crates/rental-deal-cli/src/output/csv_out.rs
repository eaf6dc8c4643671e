use serde_json::Value;
use std::io;

/// Write the metrics as `field,value` rows, followed by any warnings.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_rows(&mut wtr, value) {
        eprintln!("CSV write error: {}", e);
    }
    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;

    let rows = match value.get("result") {
        Some(Value::Object(result)) => result,
        _ => match value {
            Value::Object(map) => map,
            _ => return wtr.write_record(["value", &format_csv_value(value)]),
        },
    };
    for (key, val) in rows {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            wtr.write_record(["warning", w])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_from_envelope() {
        let value = json!({
            "result": { "verdict": "Decent", "cap_rate_percent": "7.92" },
            "warnings": ["DSCR of 1.10 is below 1.20x"]
        });
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, &value).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(
            text,
            "field,value\ncap_rate_percent,7.92\nverdict,Decent\nwarning,DSCR of 1.10 is below 1.20x\n"
        );
    }
}
