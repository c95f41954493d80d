//! External encoder plumbing.

/// The ffmpeg operations: image sequence, still clip, concat, normalize.
pub mod ffmpeg;
/// Resolving which ffmpeg binary to run.
pub mod locator;

pub use locator::EncoderLocator;
