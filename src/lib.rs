//! plant-scan - photo to plant species identification
//!
//! Capture or pick a photo, send it to a remote classification service and
//! present the best match with its confidence, taxonomy and description.
//!
//! The flow is acquire → encode → classify → normalize → present, driven by
//! [`app::ScanSession`].

pub mod app;
pub mod capture;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod overlay;
pub mod shared;
pub mod vision;

pub use app::{ScanOutcome, ScanSession, ScanTicket};
pub use error::{ErrorKind, ScanError};
pub use shared::{Notification, NotificationLevel, ScanState};
