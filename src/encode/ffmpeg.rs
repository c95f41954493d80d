//! The four ffmpeg invocations the pipeline needs.
//!
//! Each operation is one synchronous process run. Argument vectors are built by pure functions
//! so they can be checked without an encoder installed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::locator::EncoderLocator;
use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::foundation::exec::{ensure_parent_dir, run_with_stderr_tail, stderr_tail};

/// How much of the encoder's stderr an error carries.
pub const STDERR_TAIL_BYTES: usize = 2048;

/// Input pattern for [`encode_image_sequence`]; numbering starts at zero.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// File name of frame `idx` under [`FRAME_PATTERN`].
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame_{:06}.png", idx.0)
}

/// `(a)` Encode a gapless numbered image sequence (`pattern` uses `%06d`) into H.264.
#[tracing::instrument(skip(locator))]
pub fn encode_image_sequence(
    locator: &EncoderLocator,
    pattern: &Path,
    fps: Fps,
    out: &Path,
) -> DocreelResult<()> {
    ensure_parent_dir(out)?;
    run(locator, image_sequence_args(pattern, fps, out))
}

/// `(b)` Turn one still into a clip of `duration` seconds, letterboxed to `resolution`.
#[tracing::instrument(skip(locator))]
pub fn still_to_clip(
    locator: &EncoderLocator,
    image: &Path,
    duration: f64,
    resolution: Resolution,
    fps: Fps,
    out: &Path,
) -> DocreelResult<()> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(DocreelError::validation(format!(
            "clip duration must be > 0 (got {duration})"
        )));
    }
    ensure_parent_dir(out)?;
    run(locator, still_clip_args(image, duration, resolution, fps, out))
}

/// `(c)` Concatenate same-codec clips in order, optionally muxing `audio` cut to the video length.
///
/// The manifest is written to `manifest`; an empty clip list is rejected before anything runs.
#[tracing::instrument(skip(locator, clips), fields(clips = clips.len()))]
pub fn concat(
    locator: &EncoderLocator,
    clips: &[PathBuf],
    audio: Option<&Path>,
    manifest: &Path,
    out: &Path,
) -> DocreelResult<()> {
    if clips.is_empty() {
        return Err(DocreelError::encode("nothing to concatenate: clip list is empty"));
    }
    // The concat demuxer resolves relative entries against the manifest's directory.
    let clips: Vec<PathBuf> = clips
        .iter()
        .map(|c| std::path::absolute(c).unwrap_or_else(|_| c.clone()))
        .collect();
    ensure_parent_dir(manifest)?;
    std::fs::write(manifest, concat_manifest(&clips)).map_err(|e| {
        DocreelError::encode(format!(
            "failed to write concat manifest '{}': {e}",
            manifest.display()
        ))
    })?;
    ensure_parent_dir(out)?;
    run(locator, concat_args(manifest, audio, out))
}

/// `(d)` Re-encode a raw recording to the target size and rate, without audio.
#[tracing::instrument(skip(locator))]
pub fn normalize_recording(
    locator: &EncoderLocator,
    input: &Path,
    resolution: Resolution,
    fps: Fps,
    out: &Path,
) -> DocreelResult<()> {
    ensure_parent_dir(out)?;
    run(locator, normalize_args(input, resolution, fps, out))
}

/// One `file '<path>'` line per clip. Single quotes are closed, escaped and reopened.
pub fn concat_manifest(clips: &[PathBuf]) -> String {
    let mut out = String::new();
    for clip in clips {
        let escaped = clip.to_string_lossy().replace('\'', r"'\''");
        out.push_str("file '");
        out.push_str(&escaped);
        out.push_str("'\n");
    }
    out
}

pub fn image_sequence_args(pattern: &Path, fps: Fps, out: &Path) -> Vec<OsString> {
    let mut args = os_args(["-framerate", &fps.ffmpeg_arg(), "-start_number", "0", "-i"]);
    args.push(pattern.into());
    args.extend(h264_output());
    args.push(out.into());
    args
}

pub fn still_clip_args(
    image: &Path,
    duration: f64,
    resolution: Resolution,
    fps: Fps,
    out: &Path,
) -> Vec<OsString> {
    let rate = fps.ffmpeg_arg();
    let mut args = os_args(["-loop", "1", "-framerate", &rate, "-i"]);
    args.push(image.into());
    args.extend(os_args([
        "-t",
        &format!("{duration:.3}"),
        "-vf",
        &fit_filter(resolution),
        "-r",
        &rate,
        "-an",
    ]));
    args.extend(h264_output());
    args.push(out.into());
    args
}

pub fn concat_args(manifest: &Path, audio: Option<&Path>, out: &Path) -> Vec<OsString> {
    let mut args = os_args(["-f", "concat", "-safe", "0", "-i"]);
    args.push(manifest.into());
    match audio {
        Some(audio) => {
            args.push("-i".into());
            args.push(audio.into());
            args.extend(os_args([
                "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-af", "apad",
                "-shortest",
            ]));
        }
        None => args.extend(os_args(["-c", "copy"])),
    }
    args.extend(os_args(["-movflags", "+faststart"]));
    args.push(out.into());
    args
}

pub fn normalize_args(
    input: &Path,
    resolution: Resolution,
    fps: Fps,
    out: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    args.extend(os_args([
        "-vf",
        &fit_filter(resolution),
        "-r",
        &fps.ffmpeg_arg(),
        "-an",
    ]));
    args.extend(h264_output());
    args.push(out.into());
    args
}

/// Scale into the frame keeping aspect ratio, pad the rest with black.
fn fit_filter(r: Resolution) -> String {
    let (w, h) = (r.width, r.height);
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,format=yuv420p"
    )
}

fn h264_output() -> Vec<OsString> {
    os_args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"])
}

fn os_args<const N: usize>(args: [&str; N]) -> Vec<OsString> {
    args.into_iter().map(OsString::from).collect()
}

fn run(locator: &EncoderLocator, args: Vec<OsString>) -> DocreelResult<()> {
    let mut cmd = Command::new(locator.binary());
    cmd.args(["-y", "-loglevel", "error"])
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null());
    tracing::debug!(binary = %locator.binary().display(), ?args, "running encoder");

    let (status, stderr) = run_with_stderr_tail(&mut cmd, STDERR_TAIL_BYTES).map_err(|e| {
        DocreelError::encode(format!(
            "failed to run ffmpeg '{}': {e}",
            locator.binary().display()
        ))
    })?;
    if !status.success() {
        return Err(DocreelError::encode_status(
            status,
            &stderr_tail(&stderr, STDERR_TAIL_BYTES),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
