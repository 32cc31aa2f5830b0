//! CSV export of waitlist entries.
//!
//! Quoting follows RFC 4180: a field is wrapped in double quotes when it
//! contains a comma, a double quote, CR or LF, and embedded quotes are doubled.

use chrono::SecondsFormat;

use crate::entry::WaitlistEntry;

pub const CSV_HEADER: [&str; 6] = ["ID", "Name", "Email", "Phone", "Interest", "Submitted At"];

/// Render entries as CSV, header first, one `\n`-terminated line per entry.
pub fn render_csv(entries: &[WaitlistEntry]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().copied());
    for entry in entries {
        let id = entry.id.to_string();
        let submitted_at = entry
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        push_record(
            &mut out,
            [
                id.as_str(),
                entry.name.as_str(),
                entry.email.as_str(),
                entry.phone.as_deref().unwrap_or(""),
                entry.interest.as_deref().unwrap_or(""),
                submitted_at.as_str(),
            ],
        );
    }
    out
}

/// Quote a single field if it needs it.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line = fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}
