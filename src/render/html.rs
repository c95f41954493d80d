//! Slide markup.
//!
//! Every element's inline style comes from [`layout_for`], so the markup itself carries no
//! animation logic. Images are inlined through a [`MediaCache`]; the produced document never
//! references the filesystem or the network.

use crate::animation::layout::{ElementKind, layout_for};
use crate::document::slide::{ContentSlide, CoverSlide, DisplayList, Slide, SlideBody};
use crate::foundation::core::Resolution;
use crate::render::inline::{escape_html, inline_markup, multiline_markup};
use crate::render::media::MediaCache;

/// A complete, self-contained HTML document for one slide at one phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideDocument {
    pub html: String,
}

/// Renders slides against a fixed stylesheet and viewport.
///
/// Holds the image cache, so one renderer should be reused for a whole deck.
#[derive(Debug)]
pub struct SlideRenderer {
    stylesheet: String,
    resolution: Resolution,
    media: MediaCache,
}

impl SlideRenderer {
    pub fn new(stylesheet: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            stylesheet: stylesheet.into(),
            resolution,
            media: MediaCache::new(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Render `slide` at `phase`; `phase` is clamped to `[0, 1]`.
    pub fn render(&mut self, slide: &Slide, phase: f64) -> SlideDocument {
        let phase = if phase.is_finite() {
            phase.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let (class, inner) = match &slide.body {
            SlideBody::Cover(cover) => ("cover", self.cover(slide, cover, phase)),
            SlideBody::Toc { items } => ("toc", toc(slide, items, phase)),
            SlideBody::SectionTitle { section_number } => {
                ("section", section(slide, section_number, phase))
            }
            SlideBody::Content(content) => {
                let class = if content.images.is_empty() {
                    "content no-media"
                } else {
                    "content"
                };
                (class, self.content(slide, content, phase))
            }
            SlideBody::Closing { subtitle, footer } => {
                ("closing", closing(slide, subtitle, footer, phase))
            }
            SlideBody::Unsupported { kind } => ("placeholder", placeholder(slide, kind)),
        };

        let stage = layout_for(ElementKind::Stage, phase);
        let html = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{css}\nhtml, body {{ width: {w}px; height: {h}px; }}</style></head>\
             <body><div class=\"stage {class}\" style=\"opacity:{op:.3};\">{inner}</div></body></html>",
            css = self.stylesheet,
            w = self.resolution.width,
            h = self.resolution.height,
            op = stage.opacity,
        );
        SlideDocument { html }
    }

    fn cover(&mut self, slide: &Slide, cover: &CoverSlide, phase: f64) -> String {
        let mut out = String::from("<div class=\"accent-bar\"></div>");
        if let Some(logo) = &cover.logo
            && let Some(uri) = self.media.get(&logo.path)
        {
            out.push_str(&element(
                ElementKind::Logo,
                phase,
                "img",
                "logo",
                &format!("src=\"{uri}\" alt=\"{}\"", escape_html(&logo.alt)),
                None,
            ));
        }
        out.push_str(&title(&slide.title, "h1", phase));
        if !cover.subtitle.is_empty() {
            out.push_str(&text_element(
                ElementKind::Subtitle,
                phase,
                "div",
                "subtitle",
                &multiline_markup(&cover.subtitle),
            ));
        }

        let badges: String = [&cover.version, &cover.classification]
            .into_iter()
            .filter(|b| !b.is_empty())
            .map(|b| format!("<span class=\"badge\">{}</span>", escape_html(b)))
            .collect();
        if !badges.is_empty() {
            out.push_str(&text_element(
                ElementKind::Accent,
                phase,
                "div",
                "badges",
                &badges,
            ));
        }

        if !cover.meta.is_empty() {
            let rows: String = cover
                .meta
                .iter()
                .map(|m| {
                    format!(
                        "<tr><th>{}</th><td>{}</td></tr>",
                        escape_html(&m.label),
                        inline_markup(&m.value)
                    )
                })
                .collect();
            out.push_str(&text_element(ElementKind::Meta, phase, "table", "meta", &rows));
        }

        out.push_str(&footer(&cover.footer, &cover.date, phase));
        out
    }

    fn content(&mut self, slide: &Slide, content: &ContentSlide, phase: f64) -> String {
        let mut out = String::new();
        if !content.parent_section.is_empty() {
            out.push_str(&text_element(
                ElementKind::Accent,
                phase,
                "div",
                "parent",
                &escape_html(&content.parent_section),
            ));
        }
        out.push_str(&title(&slide.title, "h2", phase));

        out.push_str("<div class=\"body\"><div class=\"text\">");
        if !content.prose.is_empty() {
            out.push_str(&text_element(
                ElementKind::Prose,
                phase,
                "p",
                "prose",
                &inline_markup(&content.prose),
            ));
        }
        let (tag, items) = match content.display_list() {
            DisplayList::Steps(items) => ("ol", items),
            DisplayList::Bullets(items) => ("ul", items),
            DisplayList::None => ("ul", &[][..]),
        };
        if !items.is_empty() {
            out.push_str(&format!("<{tag}>"));
            for (i, item) in items.iter().enumerate() {
                out.push_str(&text_element(
                    ElementKind::Item(i),
                    phase,
                    "li",
                    "item",
                    &inline_markup(item),
                ));
            }
            out.push_str(&format!("</{tag}>"));
        }
        out.push_str("</div>");

        if !content.images.is_empty() {
            out.push_str("<div class=\"media\">");
            for (i, image) in content.images.iter().enumerate() {
                // Unreadable images are skipped; the cache already warned.
                let Some(uri) = self.media.get(&image.path) else {
                    continue;
                };
                out.push_str(&element(
                    ElementKind::Image(i),
                    phase,
                    "img",
                    "shot",
                    &format!("src=\"{uri}\" alt=\"{}\"", escape_html(&image.alt)),
                    None,
                ));
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
        out
    }
}

/// One-shot render without a shared image cache.
pub fn render(
    slide: &Slide,
    phase: f64,
    stylesheet: &str,
    resolution: Resolution,
) -> SlideDocument {
    SlideRenderer::new(stylesheet, resolution).render(slide, phase)
}

fn toc(slide: &Slide, items: &[String], phase: f64) -> String {
    let mut out = title(&slide.title, "h2", phase);
    out.push_str("<ol>");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&text_element(
            ElementKind::Item(i),
            phase,
            "li",
            "item",
            &inline_markup(item),
        ));
    }
    out.push_str("</ol>");
    out
}

fn section(slide: &Slide, number: &str, phase: f64) -> String {
    let mut out = String::from("<div class=\"accent-bar\"></div>");
    if !number.is_empty() {
        out.push_str(&text_element(
            ElementKind::Accent,
            phase,
            "div",
            "number",
            &escape_html(number),
        ));
    }
    out.push_str(&title(&slide.title, "h2", phase));
    out
}

fn closing(slide: &Slide, subtitle: &str, footer_text: &str, phase: f64) -> String {
    let mut out = title(&slide.title, "h1", phase);
    if !subtitle.is_empty() {
        out.push_str(&text_element(
            ElementKind::Subtitle,
            phase,
            "div",
            "subtitle",
            &multiline_markup(subtitle),
        ));
    }
    out.push_str(&footer(footer_text, "", phase));
    out
}

fn placeholder(slide: &Slide, kind: &str) -> String {
    format!(
        "<h2>{}</h2><div class=\"subtitle\">Unsupported slide type: <code>{}</code></div>",
        multiline_markup(&slide.title),
        escape_html(kind)
    )
}

fn title(text: &str, tag: &str, phase: f64) -> String {
    text_element(ElementKind::Title, phase, tag, "title", &multiline_markup(text))
}

fn footer(left: &str, right: &str, phase: f64) -> String {
    if left.is_empty() && right.is_empty() {
        return String::new();
    }
    let inner = format!(
        "<span>{}</span><span>{}</span>",
        escape_html(left),
        escape_html(right)
    );
    text_element(ElementKind::Footer, phase, "div", "footer", &inner)
}

fn text_element(kind: ElementKind, phase: f64, tag: &str, class: &str, inner: &str) -> String {
    element(kind, phase, tag, class, "", Some(inner))
}

/// `<tag class="el class" style=..>inner</tag>`, or a void element when `inner` is `None`.
fn element(
    kind: ElementKind,
    phase: f64,
    tag: &str,
    class: &str,
    attrs: &str,
    inner: Option<&str>,
) -> String {
    let style = layout_for(kind, phase).to_css();
    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" {attrs}")
    };
    match inner {
        Some(inner) => {
            format!("<{tag} class=\"el {class}\" style=\"{style}\"{attrs}>{inner}</{tag}>")
        }
        None => format!("<{tag} class=\"el {class}\" style=\"{style}\"{attrs}>"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/html.rs"]
mod tests;
