//! Rendering traits for the serializer.
//!
//! Image sources in the span model are opaque references; turning them into
//! pixels is the embedding application's concern. Implementations are
//! provided by the consumer, with a filesystem-backed one for the CLI.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use mime_sniffer::MimeTypeSniffer;

/// Resolves embedded-image source references to PNG bytes.
pub trait ImageResolver {
    /// Get PNG-encoded bytes for an image reference.
    ///
    /// Returns `None` when the image cannot be loaded; the serializer then
    /// leaves the placeholder in place of the image.
    fn resolve_png(&self, source: &str) -> Option<Vec<u8>>;
}

/// Unit type implementation - no images available.
impl ImageResolver for () {
    fn resolve_png(&self, _source: &str) -> Option<Vec<u8>> {
        None
    }
}

impl<T: ImageResolver> ImageResolver for &T {
    fn resolve_png(&self, source: &str) -> Option<Vec<u8>> {
        (*self).resolve_png(source)
    }
}

impl<T: ImageResolver> ImageResolver for Option<T> {
    fn resolve_png(&self, source: &str) -> Option<Vec<u8>> {
        self.as_ref().and_then(|r| r.resolve_png(source))
    }
}

/// Reads image references as paths relative to a root directory.
///
/// PNG files are returned as read; other bitmaps are decoded and re-encoded
/// as PNG.
#[derive(Debug, Clone)]
pub struct FileImageResolver {
    root: PathBuf,
}

impl FileImageResolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageResolver for FileImageResolver {
    fn resolve_png(&self, source: &str) -> Option<Vec<u8>> {
        let path = self.root.join(source.trim_start_matches('/'));
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "image not readable");
                return None;
            }
        };
        if data.sniff_mime_type() == Some("image/png") {
            return Some(data);
        }
        match encode_png(&data) {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    mime = ?data.sniff_mime_type(),
                    error = %e,
                    "image could not be decoded"
                );
                None
            }
        }
    }
}

fn encode_png(data: &[u8]) -> image::ImageResult<Vec<u8>> {
    let decoded = image::load_from_memory(data)?;
    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
