use crate::types::parse_timestamp;

/// Formats an ISO-8601 timestamp as `"Mon YYYY"`, e.g. `"Mar 2024"`.
///
/// Absent or unparseable input yields an empty string.
pub fn format_date(iso: Option<&str>) -> String {
    parse_timestamp(iso)
        .map(|dt| dt.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Escapes `& < > " '` so the result is safe inside element content and
/// double-quoted attribute values. Absent input yields an empty string.
pub fn escape_html(input: Option<&str>) -> String {
    let Some(s) = input else {
        return String::new();
    };

    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
