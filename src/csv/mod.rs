//! CSV escaping and row assembly.
//!
//! Comma separators, `\n` row separators, RFC-4180-style quoting. Data cells
//! arrive already escaped where the producing extractor wants them escaped —
//! the GTIN column is deliberately emitted verbatim so spreadsheet imports
//! never reinterpret it — so [`to_csv`] only escapes the header row and
//! joins.

use std::borrow::Cow;

use crate::core::Field;

/// Quote a single CSV field when it contains a comma, a double quote, or a
/// newline; internal double quotes are doubled. Values needing no quoting
/// are returned borrowed.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        for ch in value.chars() {
            if ch == '"' {
                escaped.push_str("\"\"");
            } else {
                escaped.push(ch);
            }
        }
        escaped.push('"');
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

/// Serialize a header row plus data rows to CSV text, header first, with no
/// trailing newline. A header-only table (no data rows) is valid output.
pub fn to_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header: Vec<String> = headers
        .iter()
        .map(|h| escape_field(h).into_owned())
        .collect();
    lines.push(header.join(","));
    for row in rows {
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Resolve display headers for the selected paths against a discovered
/// field list, falling back to the raw path where no field is known.
pub fn resolve_headers(selected: &[String], fields: &[Field]) -> Vec<String> {
    selected
        .iter()
        .map(|path| {
            fields
                .iter()
                .find(|f| &f.path == path)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| path.clone())
        })
        .collect()
}

/// True when every cell of the row is blank after trimming. Such rows are
/// never emitted.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
