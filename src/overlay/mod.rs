//! Notification Surface
//!
//! Fire-and-forget delivery of toasts. The session decides *what* to say;
//! a [`Notifier`] decides how it is shown.

pub mod widgets;

use std::io::Write;

use crate::overlay::widgets::LevelStyles;
use crate::shared::Notification;

/// Receiver of user-facing notifications
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in order; handy for headless use
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Prints toasts to a terminal stream
pub struct ConsoleNotifier<W> {
    out: W,
    styles: LevelStyles,
    color: bool,
}

impl ConsoleNotifier<std::io::Stderr> {
    /// Notifier writing to stderr
    pub fn stderr(color: bool) -> Self {
        Self::new(std::io::stderr(), color)
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            styles: LevelStyles::default(),
            color,
        }
    }

    /// Format a toast as one line
    pub fn format(&self, notification: &Notification) -> String {
        let style = self.styles.for_level(notification.level);
        if self.color {
            format!(
                "[{}] \x1b[{}m{}\x1b[0m {}",
                style.icon, style.title_sgr, notification.title, notification.message
            )
        } else {
            format!("[{}] {} {}", style.icon, notification.title, notification.message)
        }
    }

    /// Consume the notifier and return its stream
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&mut self, notification: Notification) {
        let line = self.format(&notification);
        // A broken terminal is not the session's problem
        let _ = writeln!(self.out, "{}", line);
    }
}
