//! Frame capture: every (slide, phase) pair of a deck rasterized to a numbered PNG.

pub mod driver;
pub mod frames;

pub use driver::{CaptureStats, FrameCaptureDriver, Progress, ProgressFn};
pub use frames::FrameDir;
