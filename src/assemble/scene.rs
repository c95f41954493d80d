//! Hybrid-mode scenes.
//!
//! A scene file is JSON: either an array of scenes or `{"scenes": [...]}`. Each scene is a
//! `slide` (a slide recipe shown for a fixed duration) or a `recording` (a capture action run
//! against a live session).
//!
//! ```json
//! [
//!   {"type": "slide", "duration": 4, "slide": {"type": "section-title", "title": "2. Billing"}},
//!   {"type": "recording", "name": "invoice", "actions": [
//!     {"goto": "/invoices"}, {"wait": 1.0}, {"click": {"x": 640, "y": 220}}
//!   ]}
//! ]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::SlideDurations;
use crate::document::images::resolve_image;
use crate::document::parser::today;
use crate::document::slide::{
    ContentSlide, CoverSlide, ImageRef, MetaEntry, Slide, SlideBody, SlideKind,
};
use crate::document::text::{prose_summary, section_number};
use crate::engine::recording::RecordingSession;
use crate::foundation::error::{DocreelError, DocreelResult};

/// A routine that drives a live session. Opaque to the assembler.
pub trait CaptureAction {
    fn run(&self, session: &mut dyn RecordingSession) -> DocreelResult<()>;
}

impl<F> CaptureAction for F
where
    F: Fn(&mut dyn RecordingSession) -> DocreelResult<()>,
{
    fn run(&self, session: &mut dyn RecordingSession) -> DocreelResult<()> {
        self(session)
    }
}

pub enum Scene {
    Slide(Slide),
    Recording(RecordingScene),
}

pub struct RecordingScene {
    pub name: String,
    pub description: String,
    pub action: Box<dyn CaptureAction>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slide(slide) => f.debug_tuple("Slide").field(&slide.title).finish(),
            Self::Recording(rec) => f.debug_tuple("Recording").field(&rec.name).finish(),
        }
    }
}

impl Scene {
    pub fn label(&self) -> &str {
        match self {
            Self::Slide(slide) => &slide.title,
            Self::Recording(rec) => &rec.name,
        }
    }
}

/// Everything a recipe needs from the surrounding export.
#[derive(Clone, Debug)]
pub struct SceneContext {
    pub durations: SlideDurations,
    /// Directory recipe image paths are resolved against.
    pub images_dir: PathBuf,
    /// Base for relative recording URLs.
    pub app_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
enum SceneFile {
    List(Vec<SceneSpec>),
    Wrapped { scenes: Vec<SceneSpec> },
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneSpec {
    Slide {
        #[serde(default)]
        duration: Option<f64>,
        slide: SlideRecipe,
    },
    Recording {
        name: String,
        #[serde(default)]
        description: String,
        actions: Vec<ActionStep>,
    },
}

/// A slide described directly rather than parsed from Markdown.
///
/// `type` takes the serialized slide kinds (`cover`, `toc`, `section-title`, `content`,
/// `closing`); anything else becomes a placeholder slide.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct SlideRecipe {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub subtitle: String,
    pub section_number: Option<String>,
    pub parent_section: String,
    /// Body text; the prose summary is derived from it unless `prose` is given.
    pub text: String,
    pub prose: Option<String>,
    pub bullets: Vec<String>,
    pub steps: Vec<String>,
    pub images: Vec<ImageSpec>,
    pub items: Vec<String>,
    pub logo: Option<PathBuf>,
    pub version: String,
    pub classification: String,
    pub footer: String,
    pub date: Option<String>,
    pub meta: Vec<MetaEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ImageSpec {
    pub alt: String,
    pub path: String,
}

impl SlideRecipe {
    pub fn slide_kind(&self) -> Option<SlideKind> {
        serde_json::from_value(serde_json::Value::String(self.kind.clone())).ok()
    }

    /// Build the slide. `duration` falls back to the per-type default.
    pub fn build(&self, duration: Option<f64>, ctx: &SceneContext) -> Slide {
        let kind = self.slide_kind();
        let d = &ctx.durations;
        let default_duration = match kind {
            Some(SlideKind::Cover) => d.cover,
            Some(SlideKind::Toc) => d.toc,
            Some(SlideKind::SectionTitle) => d.section,
            Some(SlideKind::Closing) => d.closing,
            Some(SlideKind::Content) | None => d.content,
        };
        let duration = duration
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(default_duration);

        let body = match kind {
            Some(SlideKind::Cover) => SlideBody::Cover(CoverSlide {
                subtitle: self.subtitle.clone(),
                logo: self.logo.as_ref().and_then(|p| {
                    resolve_image(&p.to_string_lossy(), &ctx.images_dir).map(|path| ImageRef {
                        alt: "logo".to_string(),
                        path,
                    })
                }),
                version: self.version.clone(),
                classification: self.classification.clone(),
                footer: self.footer.clone(),
                date: self
                    .date
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(today),
                meta: self.meta.clone(),
            }),
            Some(SlideKind::Toc) => SlideBody::Toc {
                items: self.items.clone(),
            },
            Some(SlideKind::SectionTitle) => SlideBody::SectionTitle {
                section_number: self
                    .section_number
                    .clone()
                    .unwrap_or_else(|| section_number(&self.title)),
            },
            Some(SlideKind::Content) => SlideBody::Content(ContentSlide {
                parent_section: self.parent_section.clone(),
                text: self.text.clone(),
                prose: self
                    .prose
                    .clone()
                    .unwrap_or_else(|| prose_summary(&self.text)),
                bullets: self.bullets.clone(),
                steps: self.steps.clone(),
                images: self
                    .images
                    .iter()
                    .filter_map(|img| {
                        let path = resolve_image(&img.path, &ctx.images_dir);
                        if path.is_none() {
                            tracing::warn!(image = %img.path, "scene image not found, omitting it");
                        }
                        path.map(|path| ImageRef {
                            alt: img.alt.clone(),
                            path,
                        })
                    })
                    .collect(),
            }),
            Some(SlideKind::Closing) => SlideBody::Closing {
                subtitle: self.subtitle.clone(),
                footer: self.footer.clone(),
            },
            None => SlideBody::Unsupported {
                kind: self.kind.clone(),
            },
        };

        Slide {
            title: self.title.clone(),
            duration,
            body,
        }
    }
}

/// One step of a scripted recording.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStep {
    /// Absolute URL, or a path joined to the app URL.
    Goto(String),
    /// Seconds to keep recording.
    Wait(f64),
    Move {
        x: f64,
        y: f64,
        #[serde(default = "default_move_secs")]
        duration: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
}

fn default_move_secs() -> f64 {
    0.6
}

/// Action list loaded from a scene file.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedAction {
    pub app_url: Option<String>,
    pub steps: Vec<ActionStep>,
}

impl CaptureAction for ScriptedAction {
    fn run(&self, session: &mut dyn RecordingSession) -> DocreelResult<()> {
        for step in &self.steps {
            match step {
                ActionStep::Goto(url) => session.goto(&join_url(self.app_url.as_deref(), url)?)?,
                ActionStep::Wait(secs) => session.hold(*secs)?,
                ActionStep::Move { x, y, duration } => session.move_cursor(*x, *y, *duration)?,
                ActionStep::Click { x, y } => session.click(*x, *y)?,
            }
        }
        Ok(())
    }
}

/// Resolve `url` against `base` unless it already carries a scheme.
pub fn join_url(base: Option<&str>, url: &str) -> DocreelResult<String> {
    if url.contains("://") || url.starts_with("data:") || url.starts_with("about:") {
        return Ok(url.to_string());
    }
    let Some(base) = base.filter(|b| !b.trim().is_empty()) else {
        return Err(DocreelError::recording(format!(
            "relative url '{url}' needs video.app_url to be set"
        )));
    };
    Ok(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        url.trim_start_matches('/')
    ))
}

impl SceneSpec {
    pub fn into_scene(self, ctx: &SceneContext) -> Scene {
        match self {
            Self::Slide { duration, slide } => Scene::Slide(slide.build(duration, ctx)),
            Self::Recording {
                name,
                description,
                actions,
            } => Scene::Recording(RecordingScene {
                name,
                description,
                action: Box::new(ScriptedAction {
                    app_url: ctx.app_url.clone(),
                    steps: actions,
                }),
            }),
        }
    }
}

/// Parse scene JSON.
pub fn parse_scenes(json: &str, ctx: &SceneContext) -> DocreelResult<Vec<Scene>> {
    let file: SceneFile = serde_json::from_str(json)
        .map_err(|e| DocreelError::parse(format!("scene file: {e}")))?;
    let specs = match file {
        SceneFile::List(specs) | SceneFile::Wrapped { scenes: specs } => specs,
    };
    Ok(specs.into_iter().map(|s| s.into_scene(ctx)).collect())
}

/// Load and parse a scene file.
#[tracing::instrument(skip(ctx))]
pub fn load_scenes(path: &Path, ctx: &SceneContext) -> DocreelResult<Vec<Scene>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        DocreelError::parse(format!("read scene file '{}': {e}", path.display()))
    })?;
    let scenes = parse_scenes(&json, ctx)?;
    tracing::info!(scenes = scenes.len(), "loaded scenes");
    Ok(scenes)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/scene.rs"]
mod tests;
