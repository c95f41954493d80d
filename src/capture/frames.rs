use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::{FRAME_PATTERN, frame_file_name};
use crate::foundation::core::{FrameIndex, Resolution};
use crate::foundation::error::{DocreelError, DocreelResult};

/// Directory of numbered frames, filled strictly in index order.
///
/// Ordering contract: indices are handed out by [`FrameDir::claim`] only, so the sequence on
/// disk is gapless and never reuses an index. Each claimed path must be written before the
/// next claim.
#[derive(Debug)]
pub struct FrameDir {
    dir: PathBuf,
    next: FrameIndex,
    /// Path of the most recently written frame and the key it was rendered from.
    last: Option<(PathBuf, u128)>,
}

impl FrameDir {
    /// Create `dir` (it must not already hold frames).
    pub fn create(dir: impl Into<PathBuf>) -> DocreelResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            DocreelError::render(format!("create frame dir '{}': {e}", dir.display()))
        })?;
        if dir.join(frame_file_name(FrameIndex(0))).exists() {
            return Err(DocreelError::validation(format!(
                "frame dir '{}' already contains frames",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            next: FrameIndex(0),
            last: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `%06d` input pattern for the encoder.
    pub fn pattern(&self) -> PathBuf {
        self.dir.join(FRAME_PATTERN)
    }

    pub fn len(&self) -> u64 {
        self.next.0
    }

    pub fn is_empty(&self) -> bool {
        self.next.0 == 0
    }

    /// Write the next frame with `write`, unless the previous frame carries the same `key`, in
    /// which case it is copied instead. Returns the index that was written.
    pub fn push_with(
        &mut self,
        key: Option<u128>,
        write: impl FnOnce(&Path) -> DocreelResult<()>,
    ) -> DocreelResult<FrameIndex> {
        let idx = self.next;
        let path = self.dir.join(frame_file_name(idx));
        match (&self.last, key) {
            (Some((prev, prev_key)), Some(key)) if *prev_key == key => {
                std::fs::copy(prev, &path).map_err(|e| {
                    DocreelError::render(format!("copy frame '{}': {e}", prev.display()))
                })?;
            }
            _ => {
                write(&path)?;
                self.last = key.map(|k| (path.clone(), k));
            }
        }
        self.next = idx.next();
        Ok(idx)
    }

    /// Append a copy of an existing image as the next frame.
    pub fn push_copy(&mut self, source: &Path) -> DocreelResult<FrameIndex> {
        self.push_with(None, |path| {
            std::fs::copy(source, path).map(|_| ()).map_err(|e| {
                DocreelError::render(format!("copy frame '{}': {e}", source.display()))
            })
        })
    }
}

/// Write a solid black PNG of `resolution` to `path`.
pub fn write_black_png(path: &Path, resolution: Resolution) -> DocreelResult<()> {
    let img = image::RgbImage::from_pixel(resolution.width, resolution.height, image::Rgb([0, 0, 0]));
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| DocreelError::render(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frames.rs"]
mod tests;
