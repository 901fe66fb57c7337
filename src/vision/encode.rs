//! Image payload encoding for upload

use base64::Engine;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::capture::{ImagePayload, RawImage};
use crate::error::ScanError;
use crate::vision::models::EncodedImage;

/// Encodes raw images as standard padded base64
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Read the payload and encode it.
    ///
    /// File reads are async and the encoding itself runs on the blocking
    /// pool, so neither stalls the caller's thread.
    pub async fn encode(&self, image: &RawImage) -> Result<EncodedImage, ScanError> {
        let start = Instant::now();

        let bytes: Arc<[u8]> = match &image.payload {
            ImagePayload::File(path) => tokio::fs::read(path)
                .await
                .map_err(ScanError::Encoding)?
                .into(),
            ImagePayload::Memory(bytes) => bytes.clone(),
        };
        let len = bytes.len();

        let encoded = tokio::task::spawn_blocking(move || {
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        })
        .await
        .map_err(|e| ScanError::Encoding(std::io::Error::other(e)))?;

        debug!(
            "Encoded {} ({} bytes -> {} chars) in {:?}",
            image.name,
            len,
            encoded.len(),
            start.elapsed()
        );

        Ok(EncodedImage::new(encoded))
    }
}
