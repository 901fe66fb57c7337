//! Terminal styling for toast notifications

use crate::shared::NotificationLevel;

/// Style of a single toast
#[derive(Debug, Clone)]
pub struct ToastStyle {
    /// ANSI SGR sequence applied to the title
    pub title_sgr: &'static str,
    /// Marker printed before the title
    pub icon: &'static str,
}

impl Default for ToastStyle {
    fn default() -> Self {
        Self {
            title_sgr: "1",
            icon: "*",
        }
    }
}

/// Level-based style overrides
#[derive(Debug, Clone)]
pub struct LevelStyles {
    pub success: ToastStyle,
    pub warning: ToastStyle,
    pub error: ToastStyle,
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self {
            success: ToastStyle {
                title_sgr: "1;32",
                icon: "+",
            },
            warning: ToastStyle {
                title_sgr: "1;33",
                icon: "!",
            },
            error: ToastStyle {
                title_sgr: "1;31",
                icon: "x",
            },
        }
    }
}

impl LevelStyles {
    /// Style for `level`
    pub fn for_level(&self, level: NotificationLevel) -> &ToastStyle {
        match level {
            NotificationLevel::Success => &self.success,
            NotificationLevel::Warning => &self.warning,
            NotificationLevel::Error => &self.error,
        }
    }
}
