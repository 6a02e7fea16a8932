//! Recording pipeline
//!
//! A [`RecordingCoordinator`] starts and stops [`RecordingSession`]s. Each
//! session runs a paced capture loop that feeds composed frames to a
//! [`FrameSink`], normally the [`FFmpegEncoder`].

pub mod channel;
pub mod coordinator;
pub mod encoder;
pub mod pacing;
pub mod session;
pub mod state;

pub use channel::{CapturedFrame, FrameSink, RecordingError, RecordingResult, SinkSummary};
pub use coordinator::RecordingCoordinator;
pub use encoder::{ffmpeg_available, FFmpegEncoder};
pub use pacing::FramePacer;
pub use session::RecordingSession;
pub use state::{RecordingOutput, RecordingState};
