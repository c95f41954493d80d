use std::path::{Path, PathBuf};

use crate::foundation::error::{DocreelError, DocreelResult};

/// Per-run scratch directory beside the output, `.<stem>.docreel/`.
///
/// Any leftover from an interrupted run is cleared on [`Workspace::prepare`]. The directory is
/// removed by [`Workspace::finish`] after a successful run and kept otherwise.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace location for `output`.
    pub fn path_for(output: &Path) -> PathBuf {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let parent = output.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!(".{stem}.docreel"))
    }

    pub fn prepare(output: &Path) -> DocreelResult<Self> {
        let root = Self::path_for(output);
        if root.exists() {
            tracing::info!(dir = %root.display(), "clearing leftover workspace");
            std::fs::remove_dir_all(&root).map_err(|e| {
                DocreelError::validation(format!(
                    "cannot clear stale workspace '{}': {e}",
                    root.display()
                ))
            })?;
        }
        std::fs::create_dir_all(&root).map_err(|e| {
            DocreelError::validation(format!("cannot create workspace '{}': {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    pub fn still_path(&self, n: usize) -> PathBuf {
        self.root.join("stills").join(format!("still_{n:04}.png"))
    }

    pub fn clip_path(&self, n: usize) -> PathBuf {
        self.root.join("clips").join(format!("clip_{n:04}.mp4"))
    }

    pub fn recording_dir(&self, n: usize) -> PathBuf {
        self.root.join(format!("recording_{n:04}"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("concat.txt")
    }

    /// Remove the workspace. Only called once the output is in place.
    pub fn finish(self) -> DocreelResult<()> {
        std::fs::remove_dir_all(&self.root).map_err(|e| {
            DocreelError::Other(anyhow::anyhow!(
                "remove workspace '{}': {e}",
                self.root.display()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/workspace.rs"]
mod tests;
