//! Interactive console
//!
//! A line-based front end for the scan session. Stdin is read on its own
//! thread so commands (notably `clear`) are still accepted while a request
//! is in flight.

use async_trait::async_trait;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::pin::Pin;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::debug;

use crate::app::{ScanOutcome, ScanSession};
use crate::capture::{ImageAcquirer, ImagePicker, PathPicker};
use crate::dashboard::{render, RenderOptions};
use crate::overlay::Notifier;
use crate::vision::IdentificationPipeline;

const HELP: &str = "\
Commands:
  open [path]  pick an image and identify it (blank path cancels)
  clear        discard the current image and result
  status       show the current state
  help         show this help
  quit         exit";

/// A console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(Option<PathBuf>),
    Clear,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Command::Empty,
            "open" | "o" => Command::Open((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "clear" | "c" => Command::Clear,
            "status" | "s" => Command::Status,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Picker that asks for a path on the console
pub struct PromptPicker<'a> {
    lines: &'a mut UnboundedReceiver<String>,
}

impl<'a> PromptPicker<'a> {
    pub fn new(lines: &'a mut UnboundedReceiver<String>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl<'a> ImagePicker for PromptPicker<'a> {
    async fn pick(&mut self) -> Option<PathBuf> {
        print!("image path (blank to cancel)> ");
        let _ = std::io::stdout().flush();

        let line = self.lines.recv().await?;
        let path = line.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

/// Read stdin lines on a dedicated thread
pub fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

type InFlight<'p> = Pin<Box<dyn Future<Output = ScanOutcome> + Send + 'p>>;

/// Wait for the in-flight scan, or forever if there is none
async fn next_outcome(in_flight: &mut Option<InFlight<'_>>) -> ScanOutcome {
    match in_flight {
        Some(scan) => scan.await,
        None => std::future::pending().await,
    }
}

/// Run the console until `quit` or end of input
pub async fn run_console(
    session: &mut ScanSession,
    pipeline: &IdentificationPipeline,
    notifier: &mut dyn Notifier,
    options: &RenderOptions,
    mut lines: UnboundedReceiver<String>,
) {
    println!("{}", HELP);
    let mut in_flight: Option<InFlight<'_>> = None;

    loop {
        print!("plant-scan> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            outcome = next_outcome(&mut in_flight) => {
                in_flight = None;
                println!();
                if session.complete(outcome, notifier) {
                    println!("{}", render(session, options));
                } else {
                    debug!("Late result for a cleared scan ignored");
                }
            }
            line = lines.recv() => {
                let Some(line) = line else { break };
                match Command::parse(&line) {
                    Command::Open(path) => {
                        if session.is_scanning() {
                            println!("A scan is in progress; wait for it or `clear` it first.");
                            continue;
                        }
                        let ticket = match path {
                            Some(path) => {
                                let mut acquirer = ImageAcquirer::new(PathPicker::new(path));
                                session.acquire(&mut acquirer).await
                            }
                            None => {
                                let mut acquirer = ImageAcquirer::new(PromptPicker::new(&mut lines));
                                session.acquire(&mut acquirer).await
                            }
                        };
                        match ticket {
                            Some(ticket) => {
                                println!("{}", render(session, options));
                                in_flight = Some(Box::pin(ticket.run(pipeline)));
                            }
                            None => println!("Cancelled."),
                        }
                    }
                    Command::Clear => {
                        session.clear();
                        println!("Cleared.");
                    }
                    Command::Status => println!("{}", render(session, options)),
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Empty => {}
                    Command::Unknown(word) => println!("Unknown command `{}`; try `help`.", word),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::shared::Notification;
    use crate::vision::{Classifier, ClassificationRequest, ClassificationResponseRaw};
    use serde_json::json;
    use std::io::Write as _;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::sync::Notify;

    /// Classifier that holds each request until released
    struct GatedClassifier {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Classifier for GatedClassifier {
        async fn classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<ClassificationResponseRaw, ScanError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(ClassificationResponseRaw::from_value(json!({
                "suggestions": [{ "plant_name": "Monstera deliciosa", "probability": 0.97 }]
            })))
        }
    }

    fn gated_pipeline() -> (IdentificationPipeline, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let classifier = GatedClassifier {
            entered: entered.clone(),
            release: release.clone(),
        };
        (IdentificationPipeline::new(Box::new(classifier)), entered, release)
    }

    fn leaf_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"leaf").unwrap();
        file
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_console_discards_result_after_clear() {
        let (pipeline, entered, release) = gated_pipeline();
        let file = leaf_file();
        let (tx, rx) = unbounded_channel();
        let mut session = ScanSession::new();
        let mut notes: Vec<Notification> = Vec::new();
        let options = RenderOptions::default();

        let driver = async {
            tx.send(format!("open {}", file.path().display())).unwrap();
            entered.notified().await;

            tx.send("clear".to_string()).unwrap();
            settle().await;

            // The service answers after the user has moved on
            release.notify_one();
            settle().await;
            tx.send("quit".to_string()).unwrap();
        };

        tokio::join!(
            run_console(&mut session, &pipeline, &mut notes, &options, rx),
            driver
        );

        assert!(session.state().is_idle());
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_console_applies_result_without_clear() {
        let (pipeline, entered, release) = gated_pipeline();
        let file = leaf_file();
        let (tx, rx) = unbounded_channel();
        let mut session = ScanSession::new();
        let mut notes: Vec<Notification> = Vec::new();
        let options = RenderOptions::default();

        let driver = async {
            tx.send(format!("open {}", file.path().display())).unwrap();
            entered.notified().await;
            release.notify_one();
            settle().await;
            tx.send("quit".to_string()).unwrap();
        };

        tokio::join!(
            run_console(&mut session, &pipeline, &mut notes, &options, rx),
            driver
        );

        assert_eq!(
            session.state().result().and_then(|r| r.scientific_name.as_deref()),
            Some("Monstera deliciosa")
        );
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("open"), Command::Open(None));
        assert_eq!(
            Command::parse("  open  photos/my fern.jpg "),
            Command::Open(Some(PathBuf::from("photos/my fern.jpg")))
        );
        assert_eq!(Command::parse("clear"), Command::Clear);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("scan"), Command::Unknown("scan".to_string()));
    }

    #[tokio::test]
    async fn test_prompt_picker() {
        let (tx, mut rx) = unbounded_channel();
        tx.send("  leaves/oak.jpg ".to_string()).unwrap();
        tx.send(String::new()).unwrap();

        let mut picker = PromptPicker::new(&mut rx);
        assert_eq!(picker.pick().await, Some(PathBuf::from("leaves/oak.jpg")));
        // Blank line cancels
        assert_eq!(picker.pick().await, None);

        drop(tx);
        // End of input cancels too
        assert_eq!(picker.pick().await, None);
    }
}
