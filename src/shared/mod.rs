//! State and messages shared between the scan session and the presentation
//! layer

pub mod messages;
pub mod state;

pub use messages::{Notification, NotificationLevel};
pub use state::ScanState;
