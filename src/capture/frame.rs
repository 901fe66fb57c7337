//! Raw image data handed over by the acquirer

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Where the bytes of a raw image live
#[derive(Debug, Clone)]
pub enum ImagePayload {
    /// A file chosen by the user; read lazily by the encoder
    File(PathBuf),
    /// Bytes already held in memory (camera capture, pasted data)
    Memory(Arc<[u8]>),
}

/// An acquired image, owned by the scan session until cleared or replaced
#[derive(Debug, Clone)]
pub struct RawImage {
    /// The image bytes
    pub payload: ImagePayload,
    /// Display name (file name or capture label)
    pub name: String,
    /// Handle for showing the image before classification finishes
    pub preview: PreviewHandle,
    /// When the image was acquired
    pub acquired_at: Instant,
}

impl RawImage {
    /// Create a raw image backed by a file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let preview = PreviewHandle::for_path(&path);
        Self {
            payload: ImagePayload::File(path),
            name,
            preview,
            acquired_at: Instant::now(),
        }
    }

    /// Create a raw image from in-memory bytes
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let preview = PreviewHandle::for_memory(&name, bytes.clone());
        Self {
            payload: ImagePayload::Memory(bytes),
            name,
            preview,
            acquired_at: Instant::now(),
        }
    }
}

/// Opaque display reference to an acquired image.
///
/// Built synchronously without touching the payload, so the image can be
/// shown immediately while classification runs.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    uri: String,
    source: PreviewSource,
}

#[derive(Debug, Clone)]
enum PreviewSource {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl PreviewHandle {
    fn for_path(path: &Path) -> Self {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            uri: format!("file://{}", absolute.display()),
            source: PreviewSource::File(path.to_path_buf()),
        }
    }

    fn for_memory(name: &str, bytes: Arc<[u8]>) -> Self {
        Self {
            uri: format!("memory:{}", name),
            source: PreviewSource::Memory(bytes),
        }
    }

    /// URI the presentation layer can display
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Probe pixel dimensions from the image header.
    ///
    /// Returns `None` for anything that is not a recognizable image; the
    /// preview never fails the scan.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match &self.source {
            PreviewSource::File(path) => image::image_dimensions(path).ok(),
            PreviewSource::Memory(bytes) => image::ImageReader::new(Cursor::new(bytes.as_ref()))
                .with_guessed_format()
                .ok()?
                .into_dimensions()
                .ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 200, 30]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let image = RawImage::from_path("/tmp/leaves/monstera.jpg");
        assert_eq!(image.name, "monstera.jpg");
        assert_eq!(image.preview.uri(), "file:///tmp/leaves/monstera.jpg");
        assert!(matches!(image.payload, ImagePayload::File(_)));
    }

    #[test]
    fn test_memory_preview_dimensions() {
        let image = RawImage::from_bytes("capture", tiny_png());
        assert_eq!(image.preview.uri(), "memory:capture");
        assert_eq!(image.preview.dimensions(), Some((3, 2)));
    }

    #[test]
    fn test_preview_of_non_image_is_unknown() {
        let image = RawImage::from_bytes("notes", b"not an image".to_vec());
        assert_eq!(image.preview.dimensions(), None);

        let empty = RawImage::from_bytes("empty", Vec::new());
        assert_eq!(empty.preview.dimensions(), None);
    }

    #[test]
    fn test_file_preview_dimensions() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        std::io::Write::write_all(&mut file, &tiny_png()).unwrap();

        let image = RawImage::from_path(file.path());
        assert_eq!(image.preview.dimensions(), Some((3, 2)));
    }
}
