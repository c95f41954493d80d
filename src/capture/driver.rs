use std::path::{Path, PathBuf};

use crate::animation::timing::{Transition, TransitionFrames, frames_for, total_frames, transition_plan};
use crate::capture::frames::{FrameDir, write_black_png};
use crate::document::slide::Slide;
use crate::engine::RenderEngine;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::render::html::SlideRenderer;

/// Observational progress signal. Never affects what is written.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// Frames (or clips) completed so far.
    pub done: u64,
    pub total: u64,
    /// Zero-based index of the slide or scene being worked on.
    pub item: usize,
    pub item_count: usize,
    pub title: String,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.done as f64 * 100.0 / self.total as f64
        }
    }
}

pub type ProgressFn<'a> = Box<dyn FnMut(&Progress) + 'a>;

#[derive(Clone, Debug, PartialEq)]
pub struct CaptureStats {
    pub frames: u64,
    pub slides: usize,
    /// Seconds of video the frames represent.
    pub duration: f64,
    /// `%06d` pattern to hand to the encoder.
    pub pattern: PathBuf,
}

/// Drives one engine through every frame of a deck, in order.
pub struct FrameCaptureDriver<'a, E: RenderEngine> {
    engine: E,
    renderer: SlideRenderer,
    fps: Fps,
    transition: Transition,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, E: RenderEngine> FrameCaptureDriver<'a, E> {
    pub fn new(engine: E, renderer: SlideRenderer, fps: Fps, transition: Transition) -> Self {
        Self {
            engine,
            renderer,
            fps,
            transition,
            progress: None,
        }
    }

    pub fn with_progress(mut self, f: impl FnMut(&Progress) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    fn resolution(&self) -> Resolution {
        self.renderer.resolution()
    }

    /// Rasterize every slide and transition into `dir`.
    ///
    /// Any engine failure aborts the capture; frames already written stay on disk.
    #[tracing::instrument(skip(self, slides), fields(slides = slides.len()))]
    pub fn capture(&mut self, slides: &[Slide], dir: &Path) -> DocreelResult<CaptureStats> {
        if slides.is_empty() {
            return Err(DocreelError::validation("deck has no slides to capture"));
        }
        let durations: Vec<f64> = slides.iter().map(|s| s.duration).collect();
        let total = total_frames(&durations, self.transition, self.fps);
        let plan = transition_plan(self.transition, self.fps);
        let mut frames = FrameDir::create(dir)?;

        let black = match plan {
            TransitionFrames::Black(_) => {
                let p = dir.join("black.png");
                write_black_png(&p, self.resolution())?;
                Some(p)
            }
            _ => None,
        };

        tracing::info!(total_frames = total, fps = %self.fps.ffmpeg_arg(), "capturing frames");
        let report_every = u64::from(self.fps.num / self.fps.den.max(1)).max(1);

        for (i, slide) in slides.iter().enumerate() {
            tracing::debug!(slide = i, title = %slide.title, "capturing slide");
            self.report(frames.len(), total, i, slides.len(), &slide.title);

            for phase in frames_for(slide.duration, self.fps) {
                self.push_slide_frame(&mut frames, i, slide, phase)?;
                if frames.len() % report_every == 0 {
                    self.report(frames.len(), total, i, slides.len(), &slide.title);
                }
            }

            let Some(next) = slides.get(i + 1) else {
                continue;
            };
            match &plan {
                TransitionFrames::None => {}
                TransitionFrames::Incoming(phases) => {
                    for &phase in phases {
                        self.push_slide_frame(&mut frames, i + 1, next, phase)?;
                    }
                }
                TransitionFrames::Black(n) => {
                    if let Some(black) = &black {
                        for _ in 0..*n {
                            frames.push_copy(black)?;
                        }
                    }
                }
            }
        }

        if let Some(black) = &black {
            let _ = std::fs::remove_file(black);
        }
        self.report(frames.len(), total, slides.len() - 1, slides.len(), "done");
        if frames.len() != total {
            return Err(DocreelError::render(format!(
                "frame count mismatch: wrote {}, expected {total}",
                frames.len()
            )));
        }

        Ok(CaptureStats {
            frames: frames.len(),
            slides: slides.len(),
            duration: frames.len() as f64 / self.fps.as_f64(),
            pattern: frames.pattern(),
        })
    }

    fn push_slide_frame(
        &mut self,
        frames: &mut FrameDir,
        slide_idx: usize,
        slide: &Slide,
        phase: f64,
    ) -> DocreelResult<()> {
        // Same slide at the same phase renders the same document.
        let key = ((slide_idx as u128) << 64) | u128::from(phase.to_bits());
        let resolution = self.resolution();
        let renderer = &mut self.renderer;
        let engine = &mut self.engine;
        frames.push_with(Some(key), |path| {
            let doc = renderer.render(slide, phase);
            engine.rasterize(&doc.html, resolution, path)
        })?;
        Ok(())
    }

    fn report(&mut self, done: u64, total: u64, item: usize, item_count: usize, title: &str) {
        if let Some(f) = self.progress.as_mut() {
            f(&Progress {
                done,
                total,
                item,
                item_count,
                title: title.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/driver.rs"]
mod tests;
