//! Recording pipeline contracts
//!
//! Defines the error taxonomy shared by every stage, the frame type that flows
//! from capture to encoder, and the interface an encoder sink implements.

use crate::config::ConfigError;
use image::RgbaImage;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Already recording")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("Capture error: {0}")]
    CaptureError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Result type for recording operations
pub type RecordingResult<T> = Result<T, RecordingError>;

/// One captured screen image travelling through the pipeline
///
/// Ownership moves from the capture loop to the compositor and then to the
/// sink; frames are never shared.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGBA pixels, row-major, no padding
    pub image: RgbaImage,

    /// Zero-based position in capture order
    pub index: u64,

    /// Milliseconds since the session started
    pub timestamp_ms: f64,
}

impl CapturedFrame {
    pub fn new(image: RgbaImage, index: u64, timestamp_ms: f64) -> Self {
        Self {
            image,
            index,
            timestamp_ms,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// What a sink reports once it has flushed and closed its output
#[derive(Debug, Clone, PartialEq)]
pub struct SinkSummary {
    pub frames_written: u64,
    pub output_path: Option<PathBuf>,
}

/// Consumer of composed frames, in capture order
pub trait FrameSink: Send {
    /// Append one frame to the output
    fn write_frame(&mut self, frame: CapturedFrame) -> RecordingResult<()>;

    /// Flush and close the output; the file is complete once this returns
    fn finish(self: Box<Self>) -> RecordingResult<SinkSummary>;
}
