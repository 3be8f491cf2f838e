use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate. Nested result
/// sections render as one table each; the amortization schedule is
/// summarised rather than printed period by period.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_section(None, value);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(map) => {
            let mut scalars = Builder::default();
            scalars.push_record(["Field", "Value"]);
            let mut has_scalars = false;
            for (key, val) in map {
                if val.is_object() {
                    print_section(Some(key), val);
                } else {
                    scalars.push_record([key.as_str(), &format_value(val)]);
                    has_scalars = true;
                }
            }
            if has_scalars {
                println!("{}", Table::from(scalars));
            }
        }
        _ => println!("{}", result),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for warning in warnings {
                if let Value::String(s) = warning {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_section(title: Option<&str>, value: &Value) {
    if let Value::Object(map) = value {
        if let Some(title) = title {
            println!("{}:", title);
        }
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "—".to_string(),
        Value::Array(items) => format!("[{} entries]", items.len()),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
