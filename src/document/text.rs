//! Plain-text helpers shared by the slide parser and the PDF builder.

/// Longest prose summary kept on a content slide, in characters.
pub const PROSE_LIMIT: usize = 200;
const ELLIPSIS: &str = "...";

/// Lowercase `s` and fold the accented Latin letters tutorials commonly use.
///
/// Used for marker comparison only; never for displayed text.
pub fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Fold and strip surrounding emphasis, punctuation and whitespace from a heading or label.
pub fn fold_marker(s: &str) -> String {
    let folded = fold(s);
    folded
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '_' | ':' | '.' | '`'))
        .to_string()
}

/// Leading numeric prefix of a section title: `"3. Foo"` yields `"3"`, `"Foo"` yields `""`.
pub fn section_number(title: &str) -> String {
    title
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}

/// Text of a bullet item (`- x` / `* x`), if the line is one.
pub fn bullet_item(line: &str) -> Option<&str> {
    let t = line.trim_start();
    let rest = t.strip_prefix("- ").or_else(|| t.strip_prefix("* "))?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Text of an ordered-list item (`12. x`), if the line is one.
pub fn step_item(line: &str) -> Option<&str> {
    let t = line.trim_start();
    let digits = t.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = t[digits..].strip_prefix(". ")?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// `---`, `***` or `___` (three or more, spaces allowed).
pub fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&m| compact.chars().all(|c| c == m))
}

/// Version / classification annotations that tutorials place under headings.
pub fn is_metadata_line(line: &str) -> bool {
    let folded = fold(line);
    let bare: String = folded
        .trim_start_matches(|c: char| c.is_whitespace() || c == '>')
        .chars()
        .filter(|&c| c != '*' && c != '_')
        .collect();
    ["version:", "clasificacion:", "classification:"]
        .iter()
        .any(|p| bare.starts_with(p))
}

/// Collapse runs of three or more blank lines into a single blank line and trim the ends.
pub fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blanks = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() {
            blanks += 1;
            continue;
        }
        if !out.is_empty() {
            let keep = if blanks >= 3 { 1 } else { blanks };
            out.extend(std::iter::repeat_n("", keep));
        }
        blanks = 0;
        out.push(line);
    }
    out.join("\n")
}

/// Collapse every whitespace run into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lines outside fenced code blocks; fence markers themselves are dropped.
pub fn unfenced_lines(text: &str) -> Vec<&str> {
    let mut in_fence = false;
    let mut out = Vec::new();
    for line in text.lines() {
        let t = line.trim_start();
        if t.starts_with("```") || t.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            out.push(line);
        }
    }
    out
}

/// Flatten narrative lines into a short summary.
///
/// List items, blockquotes, headings and fenced code (fence lines and their contents) are
/// left out.
pub fn prose_summary(text: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for line in unfenced_lines(text) {
        let t = line.trim();
        if t.is_empty()
            || t.starts_with('>')
            || t.starts_with('#')
            || bullet_item(t).is_some()
            || step_item(t).is_some()
        {
            continue;
        }
        parts.push(t);
    }
    truncate_chars(&collapse_whitespace(&parts.join(" ")), PROSE_LIMIT)
}

/// Cut `s` to `limit` characters, appending an ellipsis marker when anything was dropped.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        None => s.to_string(),
        Some((byte_idx, _)) => {
            let mut out = s[..byte_idx].trim_end().to_string();
            out.push_str(ELLIPSIS);
            out
        }
    }
}

/// GitHub-style anchor slug for a heading.
pub fn slugify(text: &str) -> String {
    fold(text)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[path = "../../tests/unit/document/text.rs"]
mod tests;
