use serde_json::Value;

/// Pretty-printed JSON, the default format. Decimal fields serialize as
/// strings, so the output can be piped straight back in as a reference
/// document.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render JSON output: {e}"),
    }
}
