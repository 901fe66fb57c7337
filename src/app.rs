//! Scan Session
//!
//! Owns the visible [`ScanState`] and every transition of it. A scan
//! attempt is split in three so the session is never borrowed while the
//! request is in flight:
//!
//! 1. [`ScanSession::acquire`] moves to `Scanning` and hands out a
//!    generation-stamped [`ScanTicket`]
//! 2. [`ScanTicket::run`] performs the pipeline on its own copy of the image
//! 3. [`ScanSession::complete`] applies the outcome, unless the session has
//!    since been cleared or moved on to another image
//!
//! Everything runs on one cooperative thread; ordering comes from the await
//! points, not from locks.

use tracing::{debug, error, info, warn};

use crate::capture::{ImageAcquirer, ImagePicker, PreviewHandle, RawImage};
use crate::error::{ErrorKind, ScanError};
use crate::overlay::Notifier;
use crate::shared::{Notification, ScanState};
use crate::vision::{IdentificationPipeline, PlantIdentification};

/// One outstanding scan attempt
#[derive(Debug)]
pub struct ScanTicket {
    generation: u64,
    image: RawImage,
}

impl ScanTicket {
    /// Generation the attempt belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Image being identified
    pub fn image(&self) -> &RawImage {
        &self.image
    }

    /// Run the pipeline for this attempt. Never fails: errors are carried in
    /// the outcome.
    pub async fn run(self, pipeline: &IdentificationPipeline) -> ScanOutcome {
        let result = pipeline.identify(&self.image).await;
        ScanOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Result of a finished attempt, waiting to be applied
#[derive(Debug)]
pub struct ScanOutcome {
    generation: u64,
    result: Result<PlantIdentification, ScanError>,
}

impl ScanOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<PlantIdentification, ScanError> {
        &self.result
    }
}

/// The scan state machine
#[derive(Debug, Default)]
pub struct ScanSession {
    state: ScanState,
    generation: u64,
}

impl ScanSession {
    /// Create a session in `Idle`
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// True while a request is outstanding; the presentation layer disables
    /// its capture trigger on this
    pub fn is_scanning(&self) -> bool {
        self.state.is_scanning()
    }

    /// Preview of the current image
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.state.preview()
    }

    /// Current generation stamp
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask the acquirer for an image and start scanning it.
    ///
    /// Returns `None` when the user cancels (state unchanged) or when a scan
    /// is already running (the picker is not even shown).
    pub async fn acquire<P: ImagePicker>(
        &mut self,
        acquirer: &mut ImageAcquirer<P>,
    ) -> Option<ScanTicket> {
        if self.is_scanning() {
            warn!("Capture requested while a scan is in progress; ignoring");
            return None;
        }

        let image = acquirer.acquire().await?;
        self.present(image)
    }

    /// Start a scan for an image obtained elsewhere (e.g. a camera frame
    /// already in memory). Replaces any previous image or result.
    pub fn present(&mut self, image: RawImage) -> Option<ScanTicket> {
        if self.is_scanning() {
            warn!("Image presented while a scan is in progress; ignoring");
            return None;
        }

        debug!("{} -> Previewing ({})", self.state.name(), image.name);
        self.state = ScanState::Previewing { image };
        self.begin_scan()
    }

    /// `Previewing -> Scanning`; follows every acquisition immediately
    fn begin_scan(&mut self) -> Option<ScanTicket> {
        let image = match std::mem::take(&mut self.state) {
            ScanState::Previewing { image } => image,
            other => {
                self.state = other;
                return None;
            }
        };

        self.generation += 1;
        info!("Scanning {} (generation {})", image.name, self.generation);

        let ticket = ScanTicket {
            generation: self.generation,
            image: image.clone(),
        };
        self.state = ScanState::Scanning { image };
        Some(ticket)
    }

    /// Apply a finished attempt and notify the user.
    ///
    /// Returns `false` if the outcome was stale and has been discarded.
    pub fn complete(&mut self, outcome: ScanOutcome, notifier: &mut dyn Notifier) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Discarding outcome of generation {} (current {})",
                outcome.generation, self.generation
            );
            return false;
        }

        let image = match std::mem::take(&mut self.state) {
            ScanState::Scanning { image } => image,
            other => {
                debug!("Discarding outcome: session is {}", other.name());
                self.state = other;
                return false;
            }
        };

        match outcome.result {
            Ok(result) => {
                notifier.notify(Notification::identified(result.scientific_name.as_deref()));
                self.state = ScanState::Success { image, result };
            }
            Err(err) => {
                let reason = err.kind();
                if reason == ErrorKind::NoMatchFound {
                    info!("No match for {}", image.name);
                    notifier.notify(Notification::no_match());
                } else {
                    error!("Scan of {} failed: {}", image.name, err);
                    notifier.notify(Notification::failure());
                }
                self.state = ScanState::Failed { image, reason };
            }
        }

        debug!("Scan finished in {}", self.state.name());
        true
    }

    /// Drop the image and any result and return to `Idle`.
    ///
    /// An outstanding request is not cancelled; its outcome will be
    /// discarded when it arrives.
    pub fn clear(&mut self) {
        if !self.state.is_idle() {
            info!("Clearing scan ({})", self.state.name());
        }
        self.state = ScanState::Idle;
        self.generation += 1;
    }

    /// Acquire, identify and apply in one go.
    ///
    /// Returns `true` if an attempt ran to completion.
    pub async fn scan<P: ImagePicker>(
        &mut self,
        acquirer: &mut ImageAcquirer<P>,
        pipeline: &IdentificationPipeline,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let Some(ticket) = self.acquire(acquirer).await else {
            return false;
        };
        let outcome = ticket.run(pipeline).await;
        self.complete(outcome, notifier)
    }
}
