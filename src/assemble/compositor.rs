use std::path::{Path, PathBuf};

use crate::animation::timing::Transition;
use crate::assemble::scene::{RecordingScene, Scene};
use crate::assemble::workspace::Workspace;
use crate::capture::driver::{FrameCaptureDriver, Progress, ProgressFn};
use crate::config::VideoMode;
use crate::document::slide::Slide;
use crate::encode::ffmpeg::{concat, encode_image_sequence, normalize_recording, still_to_clip};
use crate::encode::locator::EncoderLocator;
use crate::engine::RenderEngine;
use crate::engine::recording::FrameRecorder;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::foundation::exec::ensure_parent_dir;
use crate::render::html::SlideRenderer;

/// Clips produced by one assembly mode, in playback order.
#[derive(Clone, Debug, PartialEq)]
pub struct Assembled {
    pub mode: VideoMode,
    pub clips: Vec<PathBuf>,
    /// Frames captured (animated mode only).
    pub frames: u64,
    /// Seconds of video across all clips.
    pub duration: f64,
    /// Recording scenes that failed and were left out.
    pub skipped: Vec<String>,
}

/// Turns slides or scenes into clips and concatenates them.
///
/// Owns the engine for the run; every capture and every encoder call happens one at a time.
pub struct Compositor<'a, E: RenderEngine> {
    engine: E,
    stylesheet: String,
    resolution: Resolution,
    fps: Fps,
    encoder: &'a EncoderLocator,
    workspace: &'a Workspace,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, E: RenderEngine> Compositor<'a, E> {
    pub fn new(
        engine: E,
        stylesheet: impl Into<String>,
        resolution: Resolution,
        fps: Fps,
        encoder: &'a EncoderLocator,
        workspace: &'a Workspace,
    ) -> Self {
        Self {
            engine,
            stylesheet: stylesheet.into(),
            resolution,
            fps,
            encoder,
            workspace,
            progress: None,
        }
    }

    pub fn with_progress(mut self, f: impl FnMut(&Progress) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    fn renderer(&self) -> SlideRenderer {
        SlideRenderer::new(self.stylesheet.clone(), self.resolution)
    }

    /// Frame-by-frame capture of the whole deck, encoded as one continuous clip.
    #[tracing::instrument(skip_all, fields(slides = slides.len()))]
    pub fn animated(&mut self, slides: &[Slide], transition: Transition) -> DocreelResult<Assembled> {
        let renderer = self.renderer();
        let mut driver = FrameCaptureDriver::new(&mut self.engine, renderer, self.fps, transition);
        if let Some(f) = self.progress.as_mut() {
            driver = driver.with_progress(|p: &Progress| f(p));
        }
        let stats = driver.capture(slides, &self.workspace.frames_dir())?;
        drop(driver);

        let deck = self.workspace.clip_path(0);
        tracing::info!(frames = stats.frames, "encoding frame sequence");
        encode_image_sequence(self.encoder, &stats.pattern, self.fps, &deck)?;

        Ok(Assembled {
            mode: VideoMode::Animated,
            clips: vec![deck],
            frames: stats.frames,
            duration: stats.duration,
            skipped: Vec::new(),
        })
    }

    /// One fully revealed still per slide, each held for the slide's duration.
    #[tracing::instrument(skip_all, fields(slides = slides.len()))]
    pub fn slides(&mut self, slides: &[Slide]) -> DocreelResult<Assembled> {
        if slides.is_empty() {
            return Err(DocreelError::validation("deck has no slides to assemble"));
        }
        let mut renderer = self.renderer();
        let mut clips = Vec::with_capacity(slides.len());
        let mut duration = 0.0;
        for (i, slide) in slides.iter().enumerate() {
            self.report(i, slides.len(), &slide.title);
            clips.push(self.slide_clip(&mut renderer, i, slide)?);
            duration += slide.duration;
        }
        self.report(slides.len(), slides.len(), "done");

        Ok(Assembled {
            mode: VideoMode::Slides,
            clips,
            frames: 0,
            duration,
            skipped: Vec::new(),
        })
    }

    /// Slide scenes become still clips; recording scenes are captured live and normalized.
    ///
    /// A recording whose action fails is logged and left out. Engine and encoder failures are
    /// fatal.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
    pub fn hybrid(&mut self, scenes: &[Scene]) -> DocreelResult<Assembled> {
        let mut renderer = self.renderer();
        let mut clips = Vec::with_capacity(scenes.len());
        let mut skipped = Vec::new();
        let mut duration = 0.0;

        for (i, scene) in scenes.iter().enumerate() {
            self.report(i, scenes.len(), scene.label());
            match scene {
                Scene::Slide(slide) => {
                    clips.push(self.slide_clip(&mut renderer, i, slide)?);
                    duration += slide.duration;
                }
                Scene::Recording(rec) => match self.recording_clip(i, rec)? {
                    Some((clip, secs)) => {
                        clips.push(clip);
                        duration += secs;
                    }
                    None => skipped.push(rec.name.clone()),
                },
            }
        }
        self.report(scenes.len(), scenes.len(), "done");

        Ok(Assembled {
            mode: VideoMode::Hybrid,
            clips,
            frames: 0,
            duration,
            skipped,
        })
    }

    /// Concatenate `assembled` (plus optional audio) into `output`.
    ///
    /// The encoder writes inside the workspace; `output` is only replaced once that succeeded.
    pub fn write_output(
        &self,
        assembled: &Assembled,
        audio: Option<&Path>,
        output: &Path,
    ) -> DocreelResult<()> {
        let staged = self.workspace.root().join(
            output
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output.mp4")),
        );
        concat(
            self.encoder,
            &assembled.clips,
            audio,
            &self.workspace.manifest_path(),
            &staged,
        )?;
        ensure_parent_dir(output)?;
        if std::fs::rename(&staged, output).is_err() {
            std::fs::copy(&staged, output).map_err(|e| {
                DocreelError::encode(format!("move video to '{}': {e}", output.display()))
            })?;
        }
        Ok(())
    }

    fn slide_clip(
        &mut self,
        renderer: &mut SlideRenderer,
        n: usize,
        slide: &Slide,
    ) -> DocreelResult<PathBuf> {
        let still = self.workspace.still_path(n);
        ensure_parent_dir(&still)?;
        let doc = renderer.render(slide, 1.0);
        self.engine.rasterize(&doc.html, self.resolution, &still)?;
        let clip = self.workspace.clip_path(n);
        still_to_clip(
            self.encoder,
            &still,
            slide.duration,
            self.resolution,
            self.fps,
            &clip,
        )?;
        Ok(clip)
    }

    fn recording_clip(
        &mut self,
        n: usize,
        rec: &RecordingScene,
    ) -> DocreelResult<Option<(PathBuf, f64)>> {
        let dir = self.workspace.recording_dir(n);
        tracing::info!(scene = %rec.name, description = %rec.description, "recording scene");
        let page = match self.engine.live_page(self.resolution) {
            Ok(page) => page,
            Err(e @ DocreelError::Render(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(scene = %rec.name, error = %e, "no live page, skipping scene");
                return Ok(None);
            }
        };
        let mut recorder = FrameRecorder::new(page, self.resolution, self.fps, dir.join("frames"));

        match rec.action.run(&mut recorder) {
            Ok(()) => {}
            Err(e @ DocreelError::Render(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(scene = %rec.name, error = %e, "recording failed, skipping scene");
                return Ok(None);
            }
        }

        let raw = dir.join("raw.mp4");
        let stats = match recorder.finish(self.encoder, &raw) {
            Ok(stats) => stats,
            Err(DocreelError::Recording(msg)) => {
                tracing::warn!(scene = %rec.name, error = %msg, "recording produced nothing, skipping scene");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let clip = self.workspace.clip_path(n);
        normalize_recording(self.encoder, &raw, self.resolution, self.fps, &clip)?;
        Ok(Some((clip, stats.duration)))
    }

    fn report(&mut self, done: usize, count: usize, title: &str) {
        if let Some(f) = self.progress.as_mut() {
            f(&Progress {
                done: done as u64,
                total: count as u64,
                item: done.min(count.saturating_sub(1)),
                item_count: count,
                title: title.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/compositor.rs"]
mod tests;
