use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::document::slide::ImageRef;

/// Older tutorials link images as `images/foo.png` relative to the document root,
/// one level above the configured images directory.
pub const LEGACY_PREFIX: &str = "images/";

/// One `![alt](href)` occurrence in a text body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageMarkup {
    pub alt: String,
    pub href: String,
    /// Byte range of the whole markup in the scanned text.
    pub span: Range<usize>,
}

/// Find every inline image in `text`, in order.
pub fn scan_images(text: &str) -> Vec<ImageMarkup> {
    let mut out = Vec::new();
    let mut cursor = 0usize;
    while let Some(rel) = text[cursor..].find("![") {
        let start = cursor + rel;
        let alt_start = start + 2;
        let Some(alt_len) = text[alt_start..].find("](") else {
            break;
        };
        let alt = &text[alt_start..alt_start + alt_len];
        if alt.contains('\n') {
            cursor = alt_start;
            continue;
        }
        let href_start = alt_start + alt_len + 2;
        let Some(href_len) = text[href_start..].find(')') else {
            break;
        };
        let inner = &text[href_start..href_start + href_len];
        let end = href_start + href_len + 1;
        cursor = end;
        if inner.contains('\n') {
            continue;
        }
        // `![a](path "title")` and `![a](<path with spaces>)`
        let inner = inner.trim();
        let href = if let Some(stripped) = inner.strip_prefix('<') {
            stripped.split('>').next().unwrap_or_default()
        } else {
            inner.split_whitespace().next().unwrap_or_default()
        };
        if href.is_empty() {
            continue;
        }
        out.push(ImageMarkup {
            alt: alt.to_string(),
            href: href.to_string(),
            span: start..end,
        });
    }
    out
}

/// Remove every scanned image markup from `text`.
pub fn strip_images(text: &str, images: &[ImageMarkup]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for img in images {
        out.push_str(&text[last..img.span.start]);
        last = img.span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Resolve an image `href` to an existing file.
///
/// Candidates, first existing wins: `images_dir/href`, the literal path, and for
/// legacy-prefixed hrefs the same path under the parent of `images_dir`.
/// Already-absolute existing paths resolve to themselves.
pub fn resolve_image(href: &str, images_dir: &Path) -> Option<PathBuf> {
    let href = href.strip_prefix("file://").unwrap_or(href);
    let href_path = Path::new(href);

    let mut candidates = vec![images_dir.join(href_path), href_path.to_path_buf()];
    if href.starts_with(LEGACY_PREFIX)
        && let Some(parent) = images_dir.parent()
    {
        candidates.push(parent.join(href_path));
    }

    candidates.into_iter().find(|p| p.is_file())
}

/// Resolve every scanned image, silently dropping the ones that do not exist.
pub fn resolve_all(images: &[ImageMarkup], images_dir: &Path) -> Vec<ImageRef> {
    images
        .iter()
        .filter_map(|img| match resolve_image(&img.href, images_dir) {
            Some(path) => Some(ImageRef {
                alt: img.alt.clone(),
                path,
            }),
            None => {
                tracing::debug!(href = %img.href, "image reference did not resolve, dropping");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/document/images.rs"]
mod tests;
