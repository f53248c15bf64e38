use crate::domain::Tool;

use super::HEADERS;

/// Quote a field when it contains a quote, a comma or a line break; inner quotes are doubled.
pub fn escape_csv(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render tools in the given order; lines are joined with `\n`.
pub fn tools_to_csv(tools: &[Tool]) -> String {
    let mut lines = Vec::with_capacity(tools.len() + 1);
    lines.push(HEADERS.join(","));
    for t in tools {
        let row = [
            t.name.clone(),
            t.description.clone().unwrap_or_default(),
            t.quantity.to_string(),
            t.min_quantity.to_string(),
            t.location.clone().unwrap_or_default(),
            t.status().label().to_string(),
        ];
        lines.push(row.iter().map(|v| escape_csv(v)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}
