//! Export configuration.
//!
//! A JSON document (snake_case keys) describing one export. Every relative path is resolved
//! against the directory holding the config file, so a project can be moved as a unit.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::animation::timing::{Transition, TransitionKind};
use crate::document::slide::MetaEntry;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::render::theme::ThemeSelector;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Source Markdown document.
    pub input: PathBuf,
    /// PDF output path.
    pub output: PathBuf,
    /// Directory image references are resolved against first.
    pub images_dir: PathBuf,
    /// Cover page metadata; `None` suppresses the cover slide.
    pub cover: Option<CoverMeta>,
    pub closing: ClosingMeta,
    pub theme: ThemeSelector,
    pub pdf: PdfOptions,
    /// Explicit Chromium/Chrome binary.
    pub browser: Option<PathBuf>,
    /// Explicit ffmpeg binary.
    pub encoder: Option<PathBuf>,
    pub video: Option<VideoConfig>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("tutorial.md"),
            output: PathBuf::from("tutorial.pdf"),
            images_dir: PathBuf::from("images"),
            cover: Some(CoverMeta::default()),
            closing: ClosingMeta::default(),
            theme: ThemeSelector::default(),
            pdf: PdfOptions::default(),
            browser: None,
            encoder: None,
            video: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverMeta {
    /// Falls back to the document's `# Title` when empty.
    pub title: String,
    pub subtitle: String,
    pub logo: Option<PathBuf>,
    pub version: String,
    pub classification: String,
    pub footer: String,
    /// Explicit date string; `None` uses the export date.
    pub date: Option<String>,
    pub meta: Vec<MetaEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClosingMeta {
    pub title: String,
    pub subtitle: String,
    /// Falls back to the cover footer when empty.
    pub footer: String,
}

impl Default for ClosingMeta {
    fn default() -> Self {
        Self {
            title: "Thank you".to_string(),
            subtitle: String::new(),
            footer: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Paper size understood by CSS `@page { size: ... }`.
    pub format: String,
    /// CSS margin shorthand for `@page`.
    pub margin: String,
    pub toc: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            margin: "20mm 18mm".to_string(),
            toc: true,
        }
    }
}

/// Per-slide-type screen time in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SlideDurations {
    pub cover: f64,
    pub toc: f64,
    pub section: f64,
    pub content: f64,
    pub closing: f64,
}

impl Default for SlideDurations {
    fn default() -> Self {
        Self {
            cover: 5.0,
            toc: 6.0,
            section: 4.0,
            content: 8.0,
            closing: 5.0,
        }
    }
}

impl SlideDurations {
    /// Defaults for every type except content slides.
    pub fn with_content(content: f64) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DocreelResult<()> {
        for (name, v) in [
            ("cover", self.cover),
            ("toc", self.toc),
            ("section", self.section),
            ("content", self.content),
            ("closing", self.closing),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(DocreelError::validation(format!(
                    "video.durations.{name} must be > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }
}

/// How the video is assembled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// Frame-by-frame capture of every slide's entry/hold/dim animation plus transitions.
    #[default]
    Animated,
    /// One still per slide turned into a fixed-duration clip.
    Slides,
    /// Externally authored scenes mixing slides and live recordings.
    Hybrid,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub kind: TransitionKind,
    pub duration: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Crossfade,
            duration: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub output: PathBuf,
    pub resolution: Resolution,
    pub fps: u32,
    pub durations: SlideDurations,
    pub transition: TransitionConfig,
    /// Background audio, truncated to the video length.
    pub audio: Option<PathBuf>,
    pub mode: VideoMode,
    /// Scene file driving hybrid mode.
    pub scenes: Option<PathBuf>,
    /// Base URL relative recording targets are joined to.
    pub app_url: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("tutorial.mp4"),
            resolution: Resolution::default(),
            fps: 30,
            durations: SlideDurations::default(),
            transition: TransitionConfig::default(),
            audio: None,
            mode: VideoMode::default(),
            scenes: None,
            app_url: None,
        }
    }
}

impl VideoConfig {
    pub fn fps(&self) -> DocreelResult<Fps> {
        Fps::whole(self.fps)
    }

    pub fn transition(&self) -> Transition {
        Transition {
            kind: self.transition.kind,
            duration: self.transition.duration,
        }
    }

    pub fn validate(&self) -> DocreelResult<()> {
        self.resolution.validate()?;
        self.fps()?;
        self.durations.validate()?;
        let t = self.transition.duration;
        if !t.is_finite() || t < 0.0 {
            return Err(DocreelError::validation(format!(
                "video.transition.duration must be >= 0 (got {t})"
            )));
        }
        if self.mode == VideoMode::Hybrid && self.scenes.is_none() {
            return Err(DocreelError::validation(
                "video.mode 'hybrid' requires video.scenes",
            ));
        }
        Ok(())
    }
}

impl ExportConfig {
    /// Parse a config from a JSON reader. Paths are left as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> DocreelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DocreelError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a config file and resolve its relative paths against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> DocreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DocreelError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.resolve_paths(base);
        Ok(cfg)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let base = absolute(base);
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.input);
        fix(&mut self.output);
        fix(&mut self.images_dir);
        if let Some(cover) = self.cover.as_mut()
            && let Some(logo) = cover.logo.as_mut()
        {
            fix(logo);
        }
        if let ThemeSelector::File(p) = &mut self.theme {
            fix(p);
        }
        if let Some(video) = self.video.as_mut() {
            fix(&mut video.output);
            if let Some(audio) = video.audio.as_mut() {
                fix(audio);
            }
            if let Some(scenes) = video.scenes.as_mut() {
                fix(scenes);
            }
        }
    }

    pub fn validate(&self) -> DocreelResult<()> {
        if let Some(video) = &self.video {
            video.validate()?;
        }
        Ok(())
    }
}

fn absolute(p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(p))
        .unwrap_or_else(|_| p.to_path_buf())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
