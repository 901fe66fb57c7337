//! Visible scan state

use crate::capture::{PreviewHandle, RawImage};
use crate::error::ErrorKind;
use crate::vision::PlantIdentification;

/// State of the scan session; exactly one variant is active
#[derive(Debug, Clone, Default)]
pub enum ScanState {
    /// Nothing acquired
    #[default]
    Idle,
    /// Image acquired, classification not yet started
    Previewing { image: RawImage },
    /// Classification in flight
    Scanning { image: RawImage },
    /// Top match found
    Success {
        image: RawImage,
        result: PlantIdentification,
    },
    /// Attempt ended without a result: no match, or an encoding, network
    /// or service failure
    Failed { image: RawImage, reason: ErrorKind },
}

impl ScanState {
    /// Short state name for display and logs
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "Idle",
            ScanState::Previewing { .. } => "Previewing",
            ScanState::Scanning { .. } => "Scanning",
            ScanState::Success { .. } => "Success",
            ScanState::Failed { .. } => "Failed",
        }
    }

    /// The image held by this state, if any
    pub fn image(&self) -> Option<&RawImage> {
        match self {
            ScanState::Idle => None,
            ScanState::Previewing { image }
            | ScanState::Scanning { image }
            | ScanState::Success { image, .. }
            | ScanState::Failed { image, .. } => Some(image),
        }
    }

    /// Preview of the held image
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.image().map(|image| &image.preview)
    }

    /// The identification, in `Success` only
    pub fn result(&self) -> Option<&PlantIdentification> {
        match self {
            ScanState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The failure reason, in `Failed` only
    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            ScanState::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ScanState::Idle)
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanState::Scanning { .. })
    }
}
