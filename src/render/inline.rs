//! Minimal text-to-markup translation for slide text.
//!
//! Slide text is literal apart from `**bold**` and `` `code` `` spans. Structure was already
//! recovered by the parser, so nothing else is interpreted here.

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Escape `s` and translate bold and code spans. Unterminated markers stay literal.
pub fn inline_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    let mut rest = s;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('`')
            && let Some(end) = after.find('`')
        {
            out.push_str("<code>");
            out.push_str(&escape_html(&after[..end]));
            out.push_str("</code>");
            rest = &after[end + 1..];
            continue;
        }
        if let Some(after) = rest.strip_prefix("**")
            && let Some(end) = after.find("**")
            && end > 0
        {
            out.push_str("<strong>");
            out.push_str(&inline_markup(&after[..end]));
            out.push_str("</strong>");
            rest = &after[end + 2..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push_str(&escape_html(c.encode_utf8(&mut [0u8; 4])));
        }
        rest = chars.as_str();
    }
    out
}

/// Titles may span several lines; each break becomes `<br>`.
pub fn multiline_markup(s: &str) -> String {
    s.lines().map(inline_markup).collect::<Vec<_>>().join("<br>")
}

#[cfg(test)]
#[path = "../../tests/unit/render/inline.rs"]
mod tests;
