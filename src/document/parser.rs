use std::path::{Path, PathBuf};

use crate::config::{ClosingMeta, CoverMeta, SlideDurations};
use crate::document::images::{resolve_all, resolve_image, scan_images, strip_images};
use crate::document::lines::{LineClass, LineClassifier};
use crate::document::slide::{ContentSlide, CoverSlide, ImageRef, Slide, SlideBody};
use crate::document::text::{
    bullet_item, collapse_blank_runs, is_horizontal_rule, is_metadata_line, prose_summary,
    section_number, step_item, unfenced_lines,
};
use crate::foundation::error::{DocreelError, DocreelResult};

/// Extra seconds given to a content slide that shows more than one image.
pub const MULTI_IMAGE_BONUS_SECS: f64 = 2.0;

/// Everything the parser needs besides the document text.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub images_dir: PathBuf,
    pub durations: SlideDurations,
    /// `None` leaves the deck without a cover slide.
    pub cover: Option<CoverMeta>,
    pub closing: ClosingMeta,
}

impl ParseOptions {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            durations: SlideDurations::default(),
            cover: None,
            closing: ClosingMeta::default(),
        }
    }

    pub fn with_durations(mut self, durations: SlideDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_cover(mut self, cover: Option<CoverMeta>) -> Self {
        self.cover = cover;
        self
    }

    pub fn with_closing(mut self, closing: ClosingMeta) -> Self {
        self.closing = closing;
        self
    }
}

/// Parse a tutorial without cover metadata; content slides last `default_duration` seconds.
pub fn parse(markdown: &str, images_dir: &Path, default_duration: f64) -> Vec<Slide> {
    let opts = ParseOptions::new(images_dir)
        .with_durations(SlideDurations::with_content(default_duration));
    parse_with(markdown, &opts)
}

/// Read and parse a tutorial file. A missing or unreadable file is the only failure.
#[tracing::instrument(skip(opts), fields(images_dir = %opts.images_dir.display()))]
pub fn parse_file(path: &Path, opts: &ParseOptions) -> DocreelResult<Vec<Slide>> {
    let markdown = std::fs::read_to_string(path).map_err(|e| {
        DocreelError::parse(format!("read source document '{}': {e}", path.display()))
    })?;
    let slides = parse_with(&markdown, opts);
    tracing::info!(slides = slides.len(), "parsed source document");
    Ok(slides)
}

/// Parse a tutorial into the full deck: cover, toc, sections/content, closing.
///
/// Malformed input never fails; it degrades to fewer or emptier slides.
pub fn parse_with(markdown: &str, opts: &ParseOptions) -> Vec<Slide> {
    let mut parser = DeckParser::new(opts);
    for line in markdown.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[derive(Debug)]
struct PendingSubsection {
    title: String,
    parent_section: String,
    lines: Vec<String>,
}

#[derive(Debug)]
enum State {
    /// Before any subsection, or between a section heading and its first subsection.
    Outside,
    /// Inside a hand-written table of contents.
    IgnoringIndex,
    InSubsection(PendingSubsection),
}

struct DeckParser<'a> {
    opts: &'a ParseOptions,
    classifier: LineClassifier,
    state: State,
    current_section: String,
    document_title: Option<String>,
    body: Vec<Slide>,
}

impl<'a> DeckParser<'a> {
    fn new(opts: &'a ParseOptions) -> Self {
        Self {
            opts,
            classifier: LineClassifier::default(),
            state: State::Outside,
            current_section: String::new(),
            document_title: None,
            body: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let class = self.classifier.classify(line);

        if matches!(self.state, State::IgnoringIndex) {
            match class {
                LineClass::Section(_) | LineClass::SubtitleHeading => self.state = State::Outside,
                _ => return,
            }
        }

        match class {
            LineClass::Title(text) => {
                if self.document_title.is_none() && !text.is_empty() {
                    self.document_title = Some(text.to_string());
                }
            }
            LineClass::IndexHeading => {
                self.flush();
                self.state = State::IgnoringIndex;
            }
            LineClass::SubtitleHeading => {}
            LineClass::Section(text) => {
                self.flush();
                self.current_section = text.to_string();
                self.body.push(Slide {
                    title: text.to_string(),
                    duration: self.opts.durations.section,
                    body: SlideBody::SectionTitle {
                        section_number: section_number(text),
                    },
                });
            }
            LineClass::Subsection(text) => {
                self.flush();
                self.state = State::InSubsection(PendingSubsection {
                    title: text.to_string(),
                    parent_section: self.current_section.clone(),
                    lines: Vec::new(),
                });
            }
            LineClass::Text(raw) => {
                if let State::InSubsection(pending) = &mut self.state {
                    pending.lines.push(raw.to_string());
                }
            }
        }
    }

    fn flush(&mut self) {
        if let State::InSubsection(pending) = std::mem::replace(&mut self.state, State::Outside) {
            let slide = finalize_subsection(pending, self.opts);
            self.body.push(slide);
        }
    }

    fn finish(mut self) -> Vec<Slide> {
        self.flush();

        let mut deck = Vec::with_capacity(self.body.len() + 3);
        if let Some(cover) = &self.opts.cover {
            deck.push(cover_slide(cover, self.document_title.as_deref(), self.opts));
        }

        let toc_items: Vec<String> = self
            .body
            .iter()
            .filter(|s| s.is_section_title())
            .map(|s| s.title.clone())
            .collect();
        if !toc_items.is_empty() {
            deck.push(Slide {
                title: "Contents".to_string(),
                duration: self.opts.durations.toc,
                body: SlideBody::Toc { items: toc_items },
            });
        }

        deck.append(&mut self.body);
        deck.push(closing_slide(self.opts));
        deck
    }
}

fn finalize_subsection(pending: PendingSubsection, opts: &ParseOptions) -> Slide {
    let raw = pending.lines.join("\n");

    let markup = scan_images(&raw);
    let images: Vec<ImageRef> = resolve_all(&markup, &opts.images_dir);

    let stripped = strip_images(&raw, &markup);
    let kept: Vec<&str> = stripped
        .lines()
        .filter(|l| !is_metadata_line(l) && !is_horizontal_rule(l))
        .collect();
    let text = collapse_blank_runs(&kept.join("\n"));

    let narrative = unfenced_lines(&text);
    let bullets = narrative
        .iter()
        .filter_map(|l| bullet_item(l))
        .map(str::to_string)
        .collect();
    let steps = narrative
        .iter()
        .filter_map(|l| step_item(l))
        .map(str::to_string)
        .collect();
    let prose = prose_summary(&text);

    let mut duration = opts.durations.content;
    if images.len() > 1 {
        duration += MULTI_IMAGE_BONUS_SECS;
    }

    Slide {
        title: pending.title,
        duration,
        body: SlideBody::Content(ContentSlide {
            parent_section: pending.parent_section,
            text,
            prose,
            bullets,
            steps,
            images,
        }),
    }
}

fn cover_slide(cover: &CoverMeta, document_title: Option<&str>, opts: &ParseOptions) -> Slide {
    let title = if cover.title.trim().is_empty() {
        document_title.unwrap_or_default().to_string()
    } else {
        cover.title.clone()
    };

    let logo = cover.logo.as_ref().and_then(|p| {
        let href = p.to_string_lossy();
        let resolved = resolve_image(&href, &opts.images_dir);
        if resolved.is_none() {
            tracing::warn!(logo = %p.display(), "cover logo not found, rendering without it");
        }
        resolved.map(|path| ImageRef {
            alt: "logo".to_string(),
            path,
        })
    });

    let date = cover
        .date
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(today);

    Slide {
        title,
        duration: opts.durations.cover,
        body: SlideBody::Cover(CoverSlide {
            subtitle: cover.subtitle.clone(),
            logo,
            version: cover.version.clone(),
            classification: cover.classification.clone(),
            footer: cover.footer.clone(),
            date,
            meta: cover.meta.clone(),
        }),
    }
}

fn closing_slide(opts: &ParseOptions) -> Slide {
    let footer = if opts.closing.footer.is_empty() {
        opts.cover
            .as_ref()
            .map(|c| c.footer.clone())
            .unwrap_or_default()
    } else {
        opts.closing.footer.clone()
    };
    Slide {
        title: opts.closing.title.clone(),
        duration: opts.durations.closing,
        body: SlideBody::Closing {
            subtitle: opts.closing.subtitle.clone(),
            footer,
        },
    }
}

/// Export date used when the cover does not pin one.
pub fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/document/parser.rs"]
mod tests;
