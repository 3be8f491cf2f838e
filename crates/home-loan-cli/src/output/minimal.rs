use serde_json::Value;

/// Print just the headline figure from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "max_borrowing_buffered",
        "first_period_payment",
        "monthly_repayment_pi",
        "stamp_duty",
        "premium",
        "ratio",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(found) = find_field(result_obj, key) {
                if !found.is_null() {
                    println!("{}", format_minimal(&found));
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

/// Depth-first search for a field, since headline figures live on nested
/// sections (borrowing, schedule, lmi).
fn find_field(value: &Value, key: &str) -> Option<Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(key) {
        return Some(found.clone());
    }
    map.values().find_map(|v| find_field(v, key))
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
