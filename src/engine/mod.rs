//! Rendering engine boundary.
//!
//! The pipeline only needs three capabilities from a browser: rasterize a document at a
//! viewport size, print a document to PDF, and hand out the [`LivePage`] that recordings drive.
//! Calls are strictly sequential; an engine is never shared.

use std::path::Path;

use crate::foundation::core::Resolution;
use crate::foundation::error::{DocreelError, DocreelResult};

pub mod chromium;
pub mod recording;

pub use chromium::ChromiumEngine;
pub use recording::{FrameRecorder, RecordingSession};

/// A page in the engine that a recording drives directly.
///
/// Pointer input is delivered to the page as real input events. Coordinates are CSS pixels in
/// the viewport.
pub trait LivePage {
    /// Load `url` and wait for it to finish loading.
    fn navigate(&mut self, url: &str) -> DocreelResult<()>;
    fn mouse_move(&mut self, x: f64, y: f64) -> DocreelResult<()>;
    /// Press and release the primary button at `(x, y)`.
    fn mouse_click(&mut self, x: f64, y: f64) -> DocreelResult<()>;
    /// Evaluate `script` in the current document.
    fn run_script(&mut self, script: &str) -> DocreelResult<()>;
    /// Write a PNG of the current view to `out`.
    fn screenshot(&mut self, out: &Path) -> DocreelResult<()>;
}

impl<P: LivePage + ?Sized> LivePage for &mut P {
    fn navigate(&mut self, url: &str) -> DocreelResult<()> {
        (**self).navigate(url)
    }

    fn mouse_move(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        (**self).mouse_move(x, y)
    }

    fn mouse_click(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        (**self).mouse_click(x, y)
    }

    fn run_script(&mut self, script: &str) -> DocreelResult<()> {
        (**self).run_script(script)
    }

    fn screenshot(&mut self, out: &Path) -> DocreelResult<()> {
        (**self).screenshot(out)
    }
}

pub trait RenderEngine {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Verify the engine can run at all. Called once before any work starts.
    fn check(&mut self) -> DocreelResult<()>;

    /// Load `html` into a `viewport`-sized view and write a PNG of it to `out`.
    fn rasterize(&mut self, html: &str, viewport: Resolution, out: &Path) -> DocreelResult<()>;

    /// Print `html` to a PDF at `out`, honouring its `@page` rules.
    fn print_pdf(&mut self, html: &str, out: &Path) -> DocreelResult<()>;

    /// The engine's live page at `viewport`, for recordings. It belongs to the same session
    /// the other calls use.
    fn live_page(&mut self, viewport: Resolution) -> DocreelResult<&mut dyn LivePage> {
        let _ = viewport;
        Err(DocreelError::recording(format!(
            "engine '{}' cannot drive live pages",
            self.name()
        )))
    }
}

impl<E: RenderEngine + ?Sized> RenderEngine for &mut E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn check(&mut self) -> DocreelResult<()> {
        (**self).check()
    }

    fn rasterize(&mut self, html: &str, viewport: Resolution, out: &Path) -> DocreelResult<()> {
        (**self).rasterize(html, viewport, out)
    }

    fn print_pdf(&mut self, html: &str, out: &Path) -> DocreelResult<()> {
        (**self).print_pdf(html, out)
    }

    fn live_page(&mut self, viewport: Resolution) -> DocreelResult<&mut dyn LivePage> {
        (**self).live_page(viewport)
    }
}
