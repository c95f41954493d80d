use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::foundation::error::{DocreelError, DocreelResult};

/// MIME type for an image path, judged by extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    }
}

/// Inline `path` as a `data:` URI so rendered documents never touch the filesystem.
pub fn data_uri(path: &Path) -> DocreelResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| DocreelError::render(format!("read image '{}': {e}", path.display())))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", mime_for(path)))
}

/// Memoized [`data_uri`]; a slide rendered for hundreds of frames encodes each image once.
///
/// Failures are remembered too, so a missing image warns once and is then skipped.
#[derive(Debug, Default)]
pub struct MediaCache {
    entries: HashMap<PathBuf, Option<String>>,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data URI for `path`, or `None` when the file cannot be read.
    pub fn get(&mut self, path: &Path) -> Option<&str> {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| match data_uri(path) {
                Ok(uri) => Some(uri),
                Err(e) => {
                    tracing::warn!(error = %e, "image unavailable, rendering slide without it");
                    None
                }
            })
            .as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/media.rs"]
mod tests;
