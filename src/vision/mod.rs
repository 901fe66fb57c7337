//! Identification Layer
//!
//! Encodes an acquired image, sends it to the classification service and
//! normalizes the answer:
//! - [`encode`]: raw bytes to base64
//! - [`client`]: the HTTP call behind the [`Classifier`] seam
//! - [`normalize`]: raw response to [`PlantIdentification`]

pub mod client;
pub mod encode;
pub mod models;
pub mod normalize;

use std::time::Instant;
use tracing::{debug, info};

use crate::capture::RawImage;
use crate::error::ScanError;

pub use client::{Classifier, PlantIdClient};
pub use encode::ImageEncoder;
pub use models::{
    ClassificationOptions, ClassificationRequest, ClassificationResponseRaw, EncodedImage,
    PlantIdentification,
};
pub use normalize::{normalize, NoMatch};

/// Encode → classify → normalize, for one image at a time
pub struct IdentificationPipeline {
    encoder: ImageEncoder,
    classifier: Box<dyn Classifier>,
    options: ClassificationOptions,
}

impl IdentificationPipeline {
    /// Create a pipeline with default request options
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self::with_options(classifier, ClassificationOptions::default())
    }

    /// Create a pipeline with custom request options
    pub fn with_options(classifier: Box<dyn Classifier>, options: ClassificationOptions) -> Self {
        Self {
            encoder: ImageEncoder::new(),
            classifier,
            options,
        }
    }

    /// Request options in use
    pub fn options(&self) -> ClassificationOptions {
        self.options
    }

    /// Identify the plant in `image`.
    ///
    /// An answer with no suggestions is reported as [`ScanError::NoMatch`].
    pub async fn identify(&self, image: &RawImage) -> Result<PlantIdentification, ScanError> {
        let start = Instant::now();

        let encoded = self.encoder.encode(image).await?;
        let request = ClassificationRequest {
            image: encoded,
            options: self.options,
        };

        let response = self.classifier.classify(&request).await?;
        let identification = normalize(response).map_err(|NoMatch| ScanError::NoMatch)?;

        info!(
            "Identified {} as {}",
            image.name,
            identification.scientific_name.as_deref().unwrap_or("<unnamed>")
        );
        debug!("Identification of {} took {:?}", image.name, start.elapsed());

        Ok(identification)
    }
}
