//! Stylesheets for slides and printed pages.
//!
//! A [`ThemeSelector`] names either a built-in palette or a user stylesheet on disk. Each variant
//! is served by its own [`StylesheetProvider`]; nothing is loaded dynamically.

use std::path::{Path, PathBuf};

use crate::foundation::error::{DocreelError, DocreelResult};

/// Which document a stylesheet is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleTarget {
    /// Fixed-viewport slide documents rasterized into frames.
    Slides,
    /// Paginated print document for PDF export.
    Print,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSelector {
    Builtin(String),
    /// Extra CSS appended after the default theme.
    File(PathBuf),
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::Builtin(DEFAULT_THEME.to_string())
    }
}

impl ThemeSelector {
    /// CLI form: a `.css` path (or anything containing a path separator) selects a file,
    /// anything else a built-in name.
    pub fn parse(s: &str) -> Self {
        let looks_like_path = s.ends_with(".css") || s.contains('/') || s.contains('\\');
        if looks_like_path {
            Self::File(PathBuf::from(s))
        } else {
            Self::Builtin(s.to_string())
        }
    }

    /// Resolve the stylesheet text for `target`.
    pub fn stylesheet(&self, target: StyleTarget) -> DocreelResult<String> {
        match self {
            Self::Builtin(name) => BuiltinThemes.resolve(name, target),
            Self::File(path) => FileStylesheet.resolve(&path.to_string_lossy(), target),
        }
    }
}

/// Something that turns a theme selector string into CSS.
pub trait StylesheetProvider {
    fn resolve(&self, selector: &str, target: StyleTarget) -> DocreelResult<String>;
}

pub const DEFAULT_THEME: &str = "default";

#[derive(Clone, Copy, Debug)]
struct Palette {
    background: &'static str,
    surface: &'static str,
    text: &'static str,
    muted: &'static str,
    accent: &'static str,
    accent_text: &'static str,
    font: &'static str,
}

const PALETTES: &[(&str, Palette)] = &[
    (
        "default",
        Palette {
            background: "#f5f7fb",
            surface: "#ffffff",
            text: "#1b2333",
            muted: "#5b667a",
            accent: "#2f6fed",
            accent_text: "#ffffff",
            font: "'Inter', 'Segoe UI', 'Helvetica Neue', Arial, sans-serif",
        },
    ),
    (
        "dark",
        Palette {
            background: "#11141c",
            surface: "#1a1f2b",
            text: "#e9edf5",
            muted: "#9aa5b8",
            accent: "#7aa2ff",
            accent_text: "#0d1120",
            font: "'Inter', 'Segoe UI', 'Helvetica Neue', Arial, sans-serif",
        },
    ),
    (
        "corporate",
        Palette {
            background: "#ffffff",
            surface: "#f3f3f3",
            text: "#222222",
            muted: "#666666",
            accent: "#c8102e",
            accent_text: "#ffffff",
            font: "Georgia, 'Times New Roman', serif",
        },
    ),
];

/// Names accepted by [`ThemeSelector::Builtin`].
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    PALETTES.iter().map(|(name, _)| *name)
}

/// Registry of the palettes compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinThemes;

impl StylesheetProvider for BuiltinThemes {
    fn resolve(&self, selector: &str, target: StyleTarget) -> DocreelResult<String> {
        let key = selector.trim().to_ascii_lowercase();
        let palette = PALETTES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, p)| *p)
            .ok_or_else(|| {
                DocreelError::validation(format!(
                    "unknown theme '{selector}' (built-in themes: {})",
                    builtin_names().collect::<Vec<_>>().join(", ")
                ))
            })?;
        let vars = palette_vars(&palette);
        Ok(match target {
            StyleTarget::Slides => format!("{vars}\n{SLIDE_CSS}"),
            StyleTarget::Print => format!("{vars}\n{PRINT_CSS}"),
        })
    }
}

/// User CSS file layered over the default theme.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStylesheet;

impl StylesheetProvider for FileStylesheet {
    fn resolve(&self, selector: &str, target: StyleTarget) -> DocreelResult<String> {
        let path = Path::new(selector);
        let extra = std::fs::read_to_string(path).map_err(|e| {
            DocreelError::validation(format!("read stylesheet '{}': {e}", path.display()))
        })?;
        let base = BuiltinThemes.resolve(DEFAULT_THEME, target)?;
        Ok(format!("{base}\n/* {} */\n{extra}", path.display()))
    }
}

fn palette_vars(p: &Palette) -> String {
    format!(
        ":root {{ --bg: {}; --surface: {}; --text: {}; --muted: {}; --accent: {}; --accent-text: {}; --font: {}; }}",
        p.background, p.surface, p.text, p.muted, p.accent, p.accent_text, p.font
    )
}

const SLIDE_CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
html, body { width: 100vw; height: 100vh; overflow: hidden; background: var(--bg); }
body { font-family: var(--font); color: var(--text); font-size: 2.1vw; line-height: 1.35; }
code { font-family: 'JetBrains Mono', 'Fira Code', Menlo, monospace; background: var(--surface); padding: 0 .25em; border-radius: .2em; }
.stage { position: absolute; inset: 0; padding: 6vh 6vw; display: flex; flex-direction: column; }
.el { will-change: opacity, transform; }
.accent-bar { position: absolute; left: 0; top: 0; bottom: 0; width: .8vw; background: var(--accent); }
.cover { justify-content: center; }
.cover .logo { max-height: 14vh; max-width: 30vw; object-fit: contain; margin-bottom: 4vh; }
.cover h1 { font-size: 4.6vw; line-height: 1.1; }
.cover .subtitle { font-size: 2.2vw; color: var(--muted); margin-top: 2vh; }
.cover .badges { display: flex; gap: 1vw; margin-top: 4vh; }
.badge { background: var(--accent); color: var(--accent-text); border-radius: .4em; padding: .2em .7em; font-size: 1.3vw; }
.cover .meta { margin-top: 4vh; font-size: 1.4vw; color: var(--muted); border-collapse: collapse; }
.cover .meta th { text-align: left; padding-right: 2vw; font-weight: 600; }
.footer { position: absolute; left: 6vw; right: 6vw; bottom: 4vh; display: flex; justify-content: space-between; font-size: 1.1vw; color: var(--muted); }
.toc h2 { font-size: 3.4vw; margin-bottom: 4vh; }
.toc ol { list-style: none; columns: 2; column-gap: 5vw; }
.toc li { font-size: 1.9vw; padding: .6vh 0; border-bottom: 1px solid var(--surface); }
.section { justify-content: center; }
.section .number { font-size: 12vw; font-weight: 800; color: var(--accent); line-height: 1; }
.section h2 { font-size: 4.2vw; }
.content h2 { font-size: 3.2vw; margin-bottom: 3vh; }
.content .parent { font-size: 1.2vw; text-transform: uppercase; letter-spacing: .1em; color: var(--accent); margin-bottom: 1vh; }
.content .body { display: flex; gap: 4vw; flex: 1; min-height: 0; }
.content .text { flex: 1 1 55%; }
.content ul, .content ol { padding-left: 1.2em; }
.content li { margin: .8vh 0; }
.content .prose { color: var(--muted); }
.content .media { flex: 1 1 45%; display: grid; gap: 2vh; align-content: center; }
.content .media img { width: 100%; max-height: 60vh; object-fit: contain; border-radius: .6vw; box-shadow: 0 .8vh 3vh rgba(0,0,0,.18); }
.content.no-media .text { flex-basis: 100%; }
.closing { justify-content: center; align-items: center; text-align: center; }
.closing h1 { font-size: 5.4vw; }
.closing .subtitle { font-size: 2.2vw; color: var(--muted); margin-top: 2vh; }
.placeholder { justify-content: center; align-items: center; border: .4vw dashed var(--accent); }
"#;

const PRINT_CSS: &str = r#"
* { box-sizing: border-box; }
body { font-family: var(--font); color: var(--text); font-size: 11pt; line-height: 1.5; }
h1, h2, h3, h4 { color: var(--text); line-height: 1.2; }
h2 { border-bottom: 2px solid var(--accent); padding-bottom: 4pt; margin-top: 24pt; break-after: avoid; }
h3 { color: var(--accent); margin-top: 16pt; break-after: avoid; }
a { color: var(--accent); }
code { font-family: 'JetBrains Mono', 'Fira Code', Menlo, monospace; font-size: 9.5pt; background: #f0f2f6; padding: 0 2pt; border-radius: 2pt; }
pre { background: #f0f2f6; padding: 8pt; border-radius: 4pt; white-space: pre-wrap; break-inside: avoid; }
pre code { background: none; padding: 0; }
blockquote { border-left: 3pt solid var(--accent); margin: 8pt 0; padding: 2pt 10pt; color: var(--muted); }
img { max-width: 100%; break-inside: avoid; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #d5d9e0; padding: 4pt 6pt; text-align: left; }
.cover-page { height: 100vh; display: flex; flex-direction: column; justify-content: center; break-after: page; }
.cover-page .logo { max-height: 30mm; max-width: 70mm; object-fit: contain; margin-bottom: 16mm; }
.cover-page h1 { font-size: 30pt; margin: 0; }
.cover-page .subtitle { font-size: 15pt; color: var(--muted); }
.cover-page .meta { margin-top: 14mm; width: auto; }
.cover-page .meta th, .cover-page .meta td { border: none; padding: 2pt 12pt 2pt 0; }
.cover-page .footer { margin-top: auto; color: var(--muted); font-size: 9pt; }
.toc-page { break-after: page; }
.toc-page ol { list-style: none; padding: 0; }
.toc-page li.level-3 { padding-left: 14pt; font-size: 10pt; }
.toc-page a { color: var(--text); text-decoration: none; }
"#;

#[cfg(test)]
#[path = "../../tests/unit/render/theme.rs"]
mod tests;
