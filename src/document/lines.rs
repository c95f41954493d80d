use crate::document::text::fold_marker;

/// Headings that introduce a hand-written table of contents.
const INDEX_MARKERS: &[&str] = &[
    "indice",
    "index",
    "contenido",
    "contenidos",
    "tabla de contenidos",
    "contents",
    "table of contents",
];

/// Headings that only carry the document's subtitle.
const SUBTITLE_MARKERS: &[&str] = &["subtitulo", "subtitle"];

/// Structural role of one source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `# Title`
    Title(&'a str),
    /// `## Índice` and friends.
    IndexHeading,
    /// `## Subtítulo: ...`
    SubtitleHeading,
    /// Any other `## Heading`.
    Section(&'a str),
    /// `### Heading`
    Subsection(&'a str),
    /// Everything else, including deeper headings and fenced code.
    Text(&'a str),
}

/// Classifies lines one at a time, tracking fenced code so `# comments` inside code blocks
/// stay body text.
#[derive(Debug, Default)]
pub struct LineClassifier {
    in_fence: bool,
}

impl LineClassifier {
    /// Whether the last classified line opened (or sits inside) a fenced code block.
    pub fn in_fence(&self) -> bool {
        self.in_fence
    }

    pub fn classify<'a>(&mut self, line: &'a str) -> LineClass<'a> {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            self.in_fence = !self.in_fence;
            return LineClass::Text(line);
        }
        if self.in_fence {
            return LineClass::Text(line);
        }

        match heading(line) {
            Some((1, text)) => LineClass::Title(text),
            Some((2, text)) => {
                let marker = fold_marker(text);
                if INDEX_MARKERS.contains(&marker.as_str()) {
                    LineClass::IndexHeading
                } else if is_subtitle_marker(&marker) {
                    LineClass::SubtitleHeading
                } else {
                    LineClass::Section(text)
                }
            }
            Some((3, text)) => LineClass::Subsection(text),
            _ => LineClass::Text(line),
        }
    }
}

/// `subtitulo`, or `subtitulo: text`; a word that merely starts with the marker is a section.
fn is_subtitle_marker(marker: &str) -> bool {
    SUBTITLE_MARKERS.iter().any(|m| {
        marker
            .strip_prefix(m)
            .is_some_and(|rest| rest.is_empty() || rest.trim_start().starts_with(':'))
    })
}

/// ATX heading level and text, with optional closing `#`s removed.
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some((level, text))
}

#[cfg(test)]
#[path = "../../tests/unit/document/lines.rs"]
mod tests;
