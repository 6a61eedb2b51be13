use serde::Serialize;

/// Pretty JSON for `--json` output, e.g. the resolved `Config`.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// `key: value` lines with the values aligned in one column.
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (key, value) in fields {
        println!("{:width$} {value}", format!("{key}:"));
    }
}
