//! Recording coordinator
//!
//! Owns at most one [`RecordingSession`] and drives the `Idle <-> Recording`
//! lifecycle. Collaborators for each session come from a [`CaptureBackend`],
//! so the same coordinator runs against the desktop or against fakes.

use crate::capture::{get_backend, CaptureBackend};
use crate::config::RecordingConfig;
use crate::recorder::channel::{RecordingError, RecordingResult};
use crate::recorder::session::RecordingSession;
use crate::recorder::state::{RecordingOutput, RecordingState};

pub struct RecordingCoordinator {
    backend: Box<dyn CaptureBackend>,
    session: Option<RecordingSession>,
}

impl Default for RecordingCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCoordinator {
    pub fn new() -> Self {
        Self::with_backend(Box::new(get_backend()))
    }

    pub fn with_backend(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            session: None,
        }
    }

    /// Open the screen, the encoder and pointer input, then start capturing
    ///
    /// Nothing is left running when this fails.
    pub fn start(&mut self, config: RecordingConfig) -> RecordingResult<()> {
        if self.session.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }

        config.validate()?;

        let source = self.backend.open_source()?;
        let (width, height) = source.dimensions();
        let sink = self.backend.open_sink(&config, width, height)?;
        let input = self.backend.input_channel();

        self.session = Some(RecordingSession::start(config, source, sink, input)?);
        Ok(())
    }

    /// Stop the active session and wait for its output to be finalized
    pub fn stop(&mut self) -> RecordingResult<RecordingOutput> {
        self.take_session()?.stop()
    }

    /// Detach the active session so it can be joined without holding the
    /// coordinator
    pub fn take_session(&mut self) -> RecordingResult<RecordingSession> {
        self.session.take().ok_or(RecordingError::NotRecording)
    }

    pub fn state(&self) -> RecordingState {
        match &self.session {
            Some(_) => RecordingState::Recording,
            None => RecordingState::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the active session's capture loop has ended on its own
    pub fn has_failed(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.is_active())
    }

    /// Elapsed time of the active session, 0 when idle
    pub fn duration_ms(&self) -> f64 {
        self.session
            .as_ref()
            .map(RecordingSession::duration_ms)
            .unwrap_or(0.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.session
            .as_ref()
            .map(RecordingSession::frame_count)
            .unwrap_or(0)
    }
}
