//! Notifications sent from the scan session to the user

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A toast-style message; the notifier owns how it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    /// A plant was identified
    pub fn identified(scientific_name: Option<&str>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Plant Identified!".to_string(),
            message: scientific_name.unwrap_or("Unnamed species").to_string(),
        }
    }

    /// The service had nothing to suggest
    pub fn no_match() -> Self {
        Self {
            level: NotificationLevel::Warning,
            title: "No Match Found".to_string(),
            message: "Could not identify this plant. Try a clearer photo of a leaf or flower."
                .to_string(),
        }
    }

    /// The attempt failed
    pub fn failure() -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            message: "Failed to identify the plant. Please try again.".to_string(),
        }
    }
}
