//! Single-pass print document for PDF export.
//!
//! The Markdown is filtered with the same line classifier the slide parser uses (the `# Title`
//! and any hand-written index are dropped), images are inlined as data URIs, and the rest goes
//! through `pulldown-cmark`. Every heading gets a slug anchor so the generated table of
//! contents can link into the body.

use std::collections::HashSet;
use std::path::Path;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::config::{CoverMeta, PdfOptions};
use crate::document::images::{resolve_image, scan_images};
use crate::document::lines::{LineClass, LineClassifier};
use crate::document::parser::today;
use crate::document::text::{is_metadata_line, slugify};
use crate::render::inline::escape_html;
use crate::render::media::MediaCache;

pub const TOC_TITLE: &str = "Contents";

/// One generated table-of-contents line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// 2 or 3.
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

#[derive(Clone, Debug)]
pub struct PrintDocument {
    pub title: String,
    pub toc: Vec<TocEntry>,
    pub html: String,
}

/// Inputs besides the Markdown text.
#[derive(Clone, Copy, Debug)]
pub struct PrintOptions<'a> {
    pub pdf: &'a PdfOptions,
    /// `None` prints no cover page; the document title then heads the body instead.
    pub cover: Option<&'a CoverMeta>,
    pub images_dir: &'a Path,
    pub stylesheet: &'a str,
}

/// Markdown with the slide-only structure removed and images inlined.
#[derive(Clone, Debug, Default, PartialEq)]
struct FilteredSource {
    title: Option<String>,
    body: String,
}

/// Build the full HTML page handed to the engine's print capability.
pub fn build_print_document(markdown: &str, opts: &PrintOptions<'_>) -> PrintDocument {
    let mut media = MediaCache::new();
    let source = filter_source(markdown, opts.images_dir, &mut media);

    let mut events: Vec<Event<'_>> = Parser::new_ext(&source.body, markdown_options()).collect();
    let toc = anchor_headings(&mut events);
    let mut body = String::with_capacity(source.body.len() * 3 / 2);
    html::push_html(&mut body, events.into_iter());

    let title = opts
        .cover
        .map(|c| c.title.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or(source.title)
        .unwrap_or_default();

    let mut out = String::with_capacity(body.len() + opts.stylesheet.len() + 1024);
    out.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>@page {{ size: {}; margin: {}; }}\n{}</style></head><body>",
        escape_html(&title),
        css_value(&opts.pdf.format),
        css_value(&opts.pdf.margin),
        opts.stylesheet,
    ));
    match opts.cover {
        Some(cover) => out.push_str(&cover_page(cover, &title, opts.images_dir, &mut media)),
        None if !title.is_empty() => {
            out.push_str(&format!("<h1 class=\"doc-title\">{}</h1>", escape_html(&title)));
        }
        None => {}
    }
    if opts.pdf.toc && !toc.is_empty() {
        out.push_str(&toc_page(&toc));
    }
    out.push_str("<main>");
    out.push_str(&body);
    out.push_str("</main></body></html>");

    PrintDocument {
        title,
        toc,
        html: out,
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Drop the title, subtitle heading, hand-written index and front-matter metadata lines.
fn filter_source(markdown: &str, images_dir: &Path, media: &mut MediaCache) -> FilteredSource {
    let mut classifier = LineClassifier::default();
    let mut out = FilteredSource::default();
    let mut in_index = false;
    let mut seen_heading = false;

    for line in markdown.lines() {
        let class = classifier.classify(line);
        match class {
            LineClass::Title(text) => {
                if out.title.is_none() {
                    out.title = Some(text.to_string());
                }
                continue;
            }
            LineClass::IndexHeading => {
                in_index = true;
                continue;
            }
            LineClass::SubtitleHeading => continue,
            LineClass::Section(_) => {
                in_index = false;
                seen_heading = true;
            }
            LineClass::Subsection(_) => {
                if in_index {
                    continue;
                }
                seen_heading = true;
            }
            LineClass::Text(text) => {
                if in_index {
                    continue;
                }
                if !classifier.in_fence() {
                    if !seen_heading && is_metadata_line(text) {
                        continue;
                    }
                    out.body.push_str(&inline_images(text, images_dir, media));
                    out.body.push('\n');
                    continue;
                }
            }
        }
        out.body.push_str(line);
        out.body.push('\n');
    }
    out
}

/// Replace every image target in `line` with a data URI; unresolvable images are dropped.
fn inline_images(line: &str, images_dir: &Path, media: &mut MediaCache) -> String {
    let images = scan_images(line);
    if images.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut last = 0usize;
    for img in &images {
        out.push_str(&line[last..img.span.start]);
        last = img.span.end;
        if img.href.starts_with("data:") || img.href.contains("://") {
            out.push_str(&line[img.span.clone()]);
            continue;
        }
        let uri = resolve_image(&img.href, images_dir).and_then(|p| media.get(&p).map(str::to_string));
        match uri {
            Some(uri) => out.push_str(&format!("![{}]({uri})", img.alt)),
            None => tracing::warn!(image = %img.href, "image not found, leaving it out of the pdf"),
        }
    }
    out.push_str(&line[last..]);
    out
}

/// Give every heading a unique slug id; collect H2/H3 for the table of contents.
fn anchor_headings(events: &mut [Event<'_>]) -> Vec<TocEntry> {
    let mut used = HashSet::new();
    let mut toc = Vec::new();
    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level;

        let mut title = String::new();
        let mut end = i + 1;
        while end < events.len() && !matches!(events[end], Event::End(TagEnd::Heading(_))) {
            if let Event::Text(t) | Event::Code(t) = &events[end] {
                title.push_str(t);
            }
            end += 1;
        }

        let anchor = unique_slug(&title, &mut used);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor.clone()));
        }
        let toc_level = match level {
            HeadingLevel::H2 => Some(2),
            HeadingLevel::H3 => Some(3),
            _ => None,
        };
        if let Some(level) = toc_level {
            toc.push(TocEntry {
                level,
                title: title.trim().to_string(),
                anchor,
            });
        }
        i = end + 1;
    }
    toc
}

fn unique_slug(text: &str, used: &mut HashSet<String>) -> String {
    let base = match slugify(text) {
        s if s.is_empty() => "section".to_string(),
        s => s,
    };
    let mut slug = base.clone();
    let mut n = 1;
    while !used.insert(slug.clone()) {
        slug = format!("{base}-{n}");
        n += 1;
    }
    slug
}

fn cover_page(cover: &CoverMeta, title: &str, images_dir: &Path, media: &mut MediaCache) -> String {
    let mut out = String::from("<section class=\"cover-page\">");
    if let Some(logo) = &cover.logo {
        let uri = resolve_image(&logo.to_string_lossy(), images_dir)
            .and_then(|p| media.get(&p).map(str::to_string));
        match uri {
            Some(uri) => out.push_str(&format!("<img class=\"logo\" src=\"{uri}\" alt=\"logo\">")),
            None => tracing::warn!(logo = %logo.display(), "cover logo not found"),
        }
    }
    out.push_str(&format!("<h1>{}</h1>", escape_html(title)));
    if !cover.subtitle.trim().is_empty() {
        out.push_str(&format!(
            "<p class=\"subtitle\">{}</p>",
            escape_html(cover.subtitle.trim())
        ));
    }

    let date = cover
        .date
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(today);
    let mut rows = vec![("Version", cover.version.as_str()), ("Classification", cover.classification.as_str())];
    rows.retain(|(_, v)| !v.trim().is_empty());
    rows.extend(cover.meta.iter().map(|m| (m.label.as_str(), m.value.as_str())));
    rows.push(("Date", date.as_str()));
    out.push_str("<table class=\"meta\">");
    for (label, value) in rows {
        out.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        ));
    }
    out.push_str("</table>");

    if !cover.footer.trim().is_empty() {
        out.push_str(&format!(
            "<div class=\"footer\">{}</div>",
            escape_html(cover.footer.trim())
        ));
    }
    out.push_str("</section>");
    out
}

fn toc_page(toc: &[TocEntry]) -> String {
    let mut out = format!("<nav class=\"toc-page\"><h2>{TOC_TITLE}</h2><ol>");
    for entry in toc {
        out.push_str(&format!(
            "<li class=\"level-{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            entry.anchor,
            escape_html(&entry.title)
        ));
    }
    out.push_str("</ol></nav>");
    out
}

/// Keep a config value from closing the `@page` rule early.
fn css_value(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, ';' | '{' | '}' | '<')).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/export/pdf.rs"]
mod tests;
