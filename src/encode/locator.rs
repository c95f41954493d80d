//! Where the ffmpeg binary comes from.
//!
//! Resolved once at the start of an export and passed explicitly to every encoder operation.

use std::path::{Path, PathBuf};

use crate::foundation::error::{DocreelError, DocreelResult};
use crate::foundation::exec::{executable_name, find_on_path, version_runs};

pub const ENCODER_NAME: &str = "ffmpeg";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderSource {
    /// Path given in the config or on the command line.
    Explicit,
    /// Distribution shipped next to the `docreel` executable.
    Bundled,
    /// Found on `PATH`.
    SystemPath,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderLocator {
    binary: PathBuf,
    source: EncoderSource,
}

impl EncoderLocator {
    /// Use `binary` without probing it.
    pub fn at(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            source: EncoderSource::Explicit,
        }
    }

    /// Explicit path, then a bundled distribution, then `PATH`.
    #[tracing::instrument]
    pub fn resolve(explicit: Option<&Path>) -> DocreelResult<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(DocreelError::validation(format!(
                    "configured encoder '{}' does not exist",
                    path.display()
                )));
            }
            return Ok(Self::at(path));
        }

        let bundled = bundled_candidates().into_iter().find(|p| p.is_file());
        let (binary, source) = match bundled {
            Some(p) => (p, EncoderSource::Bundled),
            None => match find_on_path(ENCODER_NAME) {
                Some(p) => (p, EncoderSource::SystemPath),
                None => {
                    return Err(DocreelError::validation(
                        "ffmpeg is required for video export, but no bundled copy was found and it is not on PATH",
                    ));
                }
            },
        };
        tracing::info!(binary = %binary.display(), ?source, "resolved encoder");
        Ok(Self { binary, source })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn source(&self) -> EncoderSource {
        self.source
    }

    /// Run `ffmpeg -version`.
    pub fn check(&self) -> DocreelResult<()> {
        if version_runs(&self.binary, "-version") {
            Ok(())
        } else {
            Err(DocreelError::validation(format!(
                "encoder '{}' could not be executed",
                self.binary.display()
            )))
        }
    }
}

/// `<exe dir>/ffmpeg` and `<exe dir>/ffmpeg/bin/ffmpeg`.
fn bundled_candidates() -> Vec<PathBuf> {
    let Ok(exe) = std::env::current_exe() else {
        return Vec::new();
    };
    let Some(dir) = exe.parent() else {
        return Vec::new();
    };
    let file = executable_name(ENCODER_NAME);
    vec![
        dir.join(&file),
        dir.join(ENCODER_NAME).join("bin").join(&file),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/encode/locator.rs"]
mod tests;
