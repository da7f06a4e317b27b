//! HTML escaping for every piece of server- or user-supplied text placed in markup.

/// Escapes text for element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a URL for an `href`/`src` attribute, dropping script URLs entirely.
pub fn escape_url(url: &str) -> String {
    let lowered = url.trim_start().to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("data:text/html") {
        return "#".to_string();
    }
    escape_html(url)
}

/// Character count as shown by the live counters (`12/1000`).
pub fn char_counter(text: &str, max: usize) -> String {
    format!("{}/{}", text.chars().count(), max)
}
