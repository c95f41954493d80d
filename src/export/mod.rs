//! Top-level export runs: Markdown to PDF, Markdown (or a scene file) to MP4.
//!
//! Each run does its pre-flight checks first (source document, rendering engine, encoder,
//! config values) so a missing collaborator fails before any work is done.

use std::path::{Path, PathBuf};

use crate::assemble::compositor::{Assembled, Compositor};
use crate::assemble::scene::{SceneContext, load_scenes};
use crate::assemble::workspace::Workspace;
use crate::capture::driver::Progress;
use crate::config::{ExportConfig, SlideDurations, VideoConfig, VideoMode};
use crate::document::parser::{ParseOptions, parse_file};
use crate::document::slide::Slide;
use crate::encode::locator::EncoderLocator;
use crate::engine::RenderEngine;
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::foundation::exec::ensure_parent_dir;
use crate::render::theme::StyleTarget;

pub mod pdf;

pub use pdf::{PrintDocument, PrintOptions, TocEntry, build_print_document};

/// What one export run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    pub output: PathBuf,
    pub bytes: u64,
    /// `None` for PDF exports.
    pub mode: Option<VideoMode>,
    /// Slides (or scenes) that went into the output.
    pub items: usize,
    /// Seconds of video; zero for PDF exports.
    pub duration: f64,
    pub frames: u64,
    pub clips: usize,
    /// Recording scenes left out after their action failed.
    pub skipped: Vec<String>,
}

impl ExportReport {
    pub fn summary(&self) -> String {
        let size = human_bytes(self.bytes);
        match self.mode {
            None => format!("wrote {} ({size})", self.output.display()),
            Some(mode) => {
                let mut s = format!(
                    "wrote {} ({size}, {:.1} s, {} items, {mode:?} mode",
                    self.output.display(),
                    self.duration,
                    self.items,
                );
                if self.frames > 0 {
                    s.push_str(&format!(", {} frames", self.frames));
                }
                if self.clips > 0 {
                    s.push_str(&format!(", {} clips", self.clips));
                }
                s.push(')');
                if !self.skipped.is_empty() {
                    s.push_str(&format!("; skipped: {}", self.skipped.join(", ")));
                }
                s
            }
        }
    }
}

fn human_bytes(n: u64) -> String {
    const KIB: f64 = 1024.0;
    let f = n as f64;
    if f < KIB {
        format!("{n} B")
    } else if f < KIB * KIB {
        format!("{:.1} KiB", f / KIB)
    } else {
        format!("{:.1} MiB", f / (KIB * KIB))
    }
}

/// Parser options derived from the config; durations come from the video section if present.
pub fn parse_options(cfg: &ExportConfig) -> ParseOptions {
    let durations = cfg
        .video
        .as_ref()
        .map(|v| v.durations)
        .unwrap_or_else(SlideDurations::default);
    ParseOptions::new(&cfg.images_dir)
        .with_durations(durations)
        .with_cover(cfg.cover.clone())
        .with_closing(cfg.closing.clone())
}

/// Parse the configured source document into the slide deck.
pub fn load_deck(cfg: &ExportConfig) -> DocreelResult<Vec<Slide>> {
    require_input(&cfg.input)?;
    parse_file(&cfg.input, &parse_options(cfg))
}

fn require_input(input: &Path) -> DocreelResult<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(DocreelError::validation(format!(
            "source document '{}' does not exist",
            input.display()
        )))
    }
}

fn video_section(cfg: &ExportConfig) -> DocreelResult<&VideoConfig> {
    cfg.video
        .as_ref()
        .ok_or_else(|| DocreelError::validation("config has no video section"))
}

/// Render the source document to a PDF at `cfg.output`.
#[tracing::instrument(skip_all, fields(input = %cfg.input.display(), output = %cfg.output.display()))]
pub fn export_pdf<E: RenderEngine>(cfg: &ExportConfig, mut engine: E) -> DocreelResult<ExportReport> {
    require_input(&cfg.input)?;
    engine.check()?;

    let stylesheet = cfg.theme.stylesheet(StyleTarget::Print)?;
    let markdown = std::fs::read_to_string(&cfg.input).map_err(|e| {
        DocreelError::parse(format!("read source document '{}': {e}", cfg.input.display()))
    })?;
    let doc = build_print_document(
        &markdown,
        &PrintOptions {
            pdf: &cfg.pdf,
            cover: cfg.cover.as_ref(),
            images_dir: &cfg.images_dir,
            stylesheet: &stylesheet,
        },
    );
    tracing::info!(headings = doc.toc.len(), engine = engine.name(), "printing pdf");

    ensure_parent_dir(&cfg.output)?;
    engine.print_pdf(&doc.html, &cfg.output)?;
    let bytes = output_size(&cfg.output)?;

    Ok(ExportReport {
        output: cfg.output.clone(),
        bytes,
        mode: None,
        items: doc.toc.len(),
        duration: 0.0,
        frames: 0,
        clips: 0,
        skipped: Vec::new(),
    })
}

/// Render the video described by `cfg.video`.
///
/// The scratch workspace is removed only when the output was written; after a failure it is
/// left beside the output for inspection.
#[tracing::instrument(skip_all, fields(input = %cfg.input.display()))]
pub fn export_video<E: RenderEngine>(
    cfg: &ExportConfig,
    mut engine: E,
    progress: impl FnMut(&Progress),
) -> DocreelResult<ExportReport> {
    let video = video_section(cfg)?;
    video.validate()?;
    if video.mode != VideoMode::Hybrid {
        require_input(&cfg.input)?;
    }
    engine.check()?;
    let encoder = EncoderLocator::resolve(cfg.encoder.as_deref())?;
    encoder.check()?;

    let fps = video.fps()?;
    let stylesheet = cfg.theme.stylesheet(StyleTarget::Slides)?;
    let workspace = Workspace::prepare(&video.output)?;
    tracing::info!(
        mode = ?video.mode,
        output = %video.output.display(),
        workspace = %workspace.root().display(),
        "starting video export"
    );

    let mut comp = Compositor::new(
        engine,
        stylesheet,
        video.resolution,
        fps,
        &encoder,
        &workspace,
    )
    .with_progress(progress);

    let (assembled, items): (Assembled, usize) = match video.mode {
        VideoMode::Animated => {
            let slides = parse_file(&cfg.input, &parse_options(cfg))?;
            (comp.animated(&slides, video.transition())?, slides.len())
        }
        VideoMode::Slides => {
            let slides = parse_file(&cfg.input, &parse_options(cfg))?;
            (comp.slides(&slides)?, slides.len())
        }
        VideoMode::Hybrid => {
            let scenes_path = video
                .scenes
                .as_deref()
                .ok_or_else(|| DocreelError::validation("video.mode 'hybrid' requires video.scenes"))?;
            let ctx = SceneContext {
                durations: video.durations,
                images_dir: cfg.images_dir.clone(),
                app_url: video.app_url.clone(),
            };
            let scenes = load_scenes(scenes_path, &ctx)?;
            (comp.hybrid(&scenes)?, scenes.len())
        }
    };

    if assembled.clips.is_empty() {
        return Err(DocreelError::validation("nothing to encode: every scene was skipped"));
    }
    comp.write_output(&assembled, video.audio.as_deref(), &video.output)?;
    drop(comp);
    workspace.finish()?;

    let bytes = output_size(&video.output)?;
    let report = ExportReport {
        output: video.output.clone(),
        bytes,
        mode: Some(assembled.mode),
        items,
        duration: assembled.duration,
        frames: assembled.frames,
        clips: assembled.clips.len(),
        skipped: assembled.skipped,
    };
    tracing::info!(bytes = report.bytes, duration = report.duration, "video export finished");
    Ok(report)
}

fn output_size(path: &Path) -> DocreelResult<u64> {
    let meta = std::fs::metadata(path).map_err(|e| {
        DocreelError::render(format!("output '{}' was not written: {e}", path.display()))
    })?;
    Ok(meta.len())
}

#[cfg(test)]
#[path = "../../tests/unit/export/mod.rs"]
mod tests;
