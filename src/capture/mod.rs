//! Image Acquisition Layer
//!
//! Turns a user gesture (camera shot, file selection) into a [`RawImage`].
//! The picker handle is owned by the acquirer; callers only get the
//! "invoke capture" capability through [`ImageAcquirer::acquire`].

pub mod frame;

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

pub use frame::{ImagePayload, PreviewHandle, RawImage};

/// A user-driven source of images.
///
/// Returning `None` means the user dismissed the picker.
#[async_trait]
pub trait ImagePicker: Send {
    async fn pick(&mut self) -> Option<PathBuf>;
}

/// Picker with a selection made up front (command line argument, tests)
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    selection: Option<PathBuf>,
}

impl PathPicker {
    /// A picker that yields `path` once
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: Some(path.into()),
        }
    }

    /// A picker the user cancels
    pub fn cancelled() -> Self {
        Self { selection: None }
    }
}

#[async_trait]
impl ImagePicker for PathPicker {
    async fn pick(&mut self) -> Option<PathBuf> {
        self.selection.take()
    }
}

/// Produces raw images from its picker
pub struct ImageAcquirer<P> {
    picker: P,
}

impl<P: ImagePicker> ImageAcquirer<P> {
    /// Create an acquirer owning `picker`
    pub fn new(picker: P) -> Self {
        Self { picker }
    }

    /// Ask the user for an image.
    ///
    /// Nothing is read or validated here; an empty or non-image file is
    /// still an acquired image and fails later in the pipeline.
    pub async fn acquire(&mut self) -> Option<RawImage> {
        let Some(path) = self.picker.pick().await else {
            debug!("Image selection cancelled");
            return None;
        };

        let image = RawImage::from_path(path);
        info!("Acquired image {} ({})", image.name, image.preview.uri());
        Some(image)
    }
}
