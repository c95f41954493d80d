//! Screen recordings of a live application.
//!
//! [`FrameRecorder`] drives the engine's [`LivePage`]: `goto` navigates the page, cursor moves
//! and clicks are sent to it as real pointer input, and a cursor and click-ripple overlay is
//! injected into whatever document is showing before each frame is captured. `finish` hands the
//! frames to the encoder's image-sequence operation.

use std::path::{Path, PathBuf};

use crate::animation::ease::Ease;
use crate::encode::ffmpeg::{FRAME_PATTERN, encode_image_sequence, frame_file_name};
use crate::encode::locator::EncoderLocator;
use crate::engine::LivePage;
use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};

/// A live browsing session a capture action drives.
///
/// Coordinates are CSS pixels in the viewport; durations are seconds.
pub trait RecordingSession {
    fn viewport(&self) -> Resolution;
    /// Load `url` and let it settle.
    fn goto(&mut self, url: &str) -> DocreelResult<()>;
    /// Glide the cursor to `(x, y)` over `secs`.
    fn move_cursor(&mut self, x: f64, y: f64, secs: f64) -> DocreelResult<()>;
    /// Move to `(x, y)` if needed, then click there.
    fn click(&mut self, x: f64, y: f64) -> DocreelResult<()>;
    /// Keep recording the current state for `secs`.
    fn hold(&mut self, secs: f64) -> DocreelResult<()>;
}

const SETTLE_SECS: f64 = 0.5;
const CLICK_TRAVEL_SECS: f64 = 0.35;
const RIPPLE_SECS: f64 = 0.45;

const CURSOR_ID: &str = "docreel-cursor";
const RIPPLE_ID: &str = "docreel-ripple";

/// Summary of a finished recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingStats {
    pub frames: u64,
    pub duration: f64,
    pub output: PathBuf,
}

pub struct FrameRecorder<P: LivePage> {
    page: P,
    viewport: Resolution,
    fps: Fps,
    dir: PathBuf,
    loaded: bool,
    cursor: (f64, f64),
    /// Click position and the frame it started on.
    ripple: Option<(f64, f64, u64)>,
    next: FrameIndex,
}

impl<P: LivePage> FrameRecorder<P> {
    /// Record `page` into `dir`, which must be empty or absent.
    pub fn new(page: P, viewport: Resolution, fps: Fps, dir: impl Into<PathBuf>) -> Self {
        Self {
            page,
            viewport,
            fps,
            dir: dir.into(),
            loaded: false,
            cursor: (
                f64::from(viewport.width) / 2.0,
                f64::from(viewport.height) / 2.0,
            ),
            ripple: None,
            next: FrameIndex(0),
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.next.0
    }

    /// Encode the captured frames into `out`. Fails when nothing was recorded.
    pub fn finish(self, encoder: &EncoderLocator, out: &Path) -> DocreelResult<RecordingStats> {
        if self.next.0 == 0 {
            return Err(DocreelError::recording("recording captured no frames"));
        }
        encode_image_sequence(encoder, &self.dir.join(FRAME_PATTERN), self.fps, out)?;
        Ok(RecordingStats {
            frames: self.next.0,
            duration: self.next.0 as f64 / self.fps.as_f64(),
            output: out.to_path_buf(),
        })
    }

    fn frames_for(&self, secs: f64) -> u64 {
        self.fps.secs_to_frames_ceil(secs)
    }

    /// Draw the overlay into the live page and capture it as the next frame.
    fn capture(&mut self) -> DocreelResult<()> {
        if !self.loaded {
            return Err(DocreelError::recording(
                "no page loaded: call goto before recording",
            ));
        }
        if self.next.0 == 0 {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                DocreelError::recording(format!(
                    "create recording dir '{}': {e}",
                    self.dir.display()
                ))
            })?;
        }

        let ripple = self.ripple.and_then(|(x, y, start)| {
            let age = (self.next.0 - start) as f64 / self.fps.as_f64();
            (age < RIPPLE_SECS).then_some((x, y, age / RIPPLE_SECS))
        });
        self.page.run_script(&overlay_script(self.cursor, ripple))?;
        self.page
            .screenshot(&self.dir.join(frame_file_name(self.next)))?;
        self.next = self.next.next();
        Ok(())
    }

    fn clamp(&self, x: f64, y: f64) -> DocreelResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(DocreelError::recording(format!(
                "cursor position ({x}, {y}) is not finite"
            )));
        }
        Ok((
            x.clamp(0.0, f64::from(self.viewport.width)),
            y.clamp(0.0, f64::from(self.viewport.height)),
        ))
    }
}

impl<P: LivePage> RecordingSession for FrameRecorder<P> {
    fn viewport(&self) -> Resolution {
        self.viewport
    }

    fn goto(&mut self, url: &str) -> DocreelResult<()> {
        if url.trim().is_empty() {
            return Err(DocreelError::recording("goto: empty url"));
        }
        tracing::debug!(url, "recording: goto");
        self.page.navigate(url)?;
        self.loaded = true;
        self.hold(SETTLE_SECS)
    }

    fn move_cursor(&mut self, x: f64, y: f64, secs: f64) -> DocreelResult<()> {
        let (x, y) = self.clamp(x, y)?;
        let n = self.frames_for(secs);
        let from = self.cursor;
        if n == 0 {
            self.cursor = (x, y);
            return self.page.mouse_move(x, y);
        }
        for i in 1..=n {
            let t = Ease::InOutCubic.apply(i as f64 / n as f64);
            self.cursor = (from.0 + (x - from.0) * t, from.1 + (y - from.1) * t);
            self.page.mouse_move(self.cursor.0, self.cursor.1)?;
            self.capture()?;
        }
        Ok(())
    }

    fn click(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        let (x, y) = self.clamp(x, y)?;
        if self.cursor != (x, y) {
            self.move_cursor(x, y, CLICK_TRAVEL_SECS)?;
        }
        tracing::debug!(x, y, "recording: click");
        self.page.mouse_click(x, y)?;
        self.ripple = Some((x, y, self.next.0));
        self.hold(RIPPLE_SECS)?;
        self.ripple = None;
        Ok(())
    }

    fn hold(&mut self, secs: f64) -> DocreelResult<()> {
        for _ in 0..self.frames_for(secs) {
            self.capture()?;
        }
        Ok(())
    }
}

/// Script that places the cursor (and, while a click is fresh, its ripple) over the current
/// document. The overlay is created on first use and again after the page navigates away.
///
/// `ripple` is `(x, y, progress)` with progress in `[0, 1)`.
pub fn overlay_script(cursor: (f64, f64), ripple: Option<(f64, f64, f64)>) -> String {
    let mut js = String::from(
        "(() => {\n\
         const root = document.body || document.documentElement;\n\
         if (!root) return;\n",
    );
    js.push_str(&format!(
        "let cursor = document.getElementById('{CURSOR_ID}');\n\
         if (!cursor) {{\n\
         cursor = document.createElement('div');\n\
         cursor.id = '{CURSOR_ID}';\n\
         cursor.style.cssText = 'position:fixed;z-index:2147483647;pointer-events:none;width:22px;height:30px;';\n\
         cursor.innerHTML = '<svg width=\"22\" height=\"30\" viewBox=\"0 0 22 30\">\
         <path d=\"M1 1 L1 24 L7 18 L11 28 L15 26 L11 17 L19 17 Z\" fill=\"#111\" stroke=\"#fff\" stroke-width=\"1.5\"/></svg>';\n\
         root.appendChild(cursor);\n\
         }}\n\
         cursor.style.left = '{:.1}px';\n\
         cursor.style.top = '{:.1}px';\n\
         let ripple = document.getElementById('{RIPPLE_ID}');\n",
        cursor.0, cursor.1,
    ));
    match ripple {
        Some((x, y, p)) => {
            let size = 16.0 + 48.0 * p;
            js.push_str(&format!(
                "if (!ripple) {{\n\
                 ripple = document.createElement('div');\n\
                 ripple.id = '{RIPPLE_ID}';\n\
                 root.appendChild(ripple);\n\
                 }}\n\
                 ripple.style.cssText = 'position:fixed;z-index:2147483646;pointer-events:none;\
                 border-radius:50%;left:{:.1}px;top:{:.1}px;width:{size:.1}px;height:{size:.1}px;\
                 border:3px solid rgba(47,111,237,{:.3});';\n",
                x - size / 2.0,
                y - size / 2.0,
                1.0 - p,
            ));
        }
        None => js.push_str("if (ripple) ripple.remove();\n"),
    }
    js.push_str("})()");
    js
}

#[cfg(test)]
#[path = "../../tests/unit/engine/recording.rs"]
mod tests;
