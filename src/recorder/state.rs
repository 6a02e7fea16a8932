use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Recorder lifecycle: `Idle -> Recording -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

impl RecordingState {
    /// Label of the control that toggles out of this state
    pub fn toggle_label(&self) -> &'static str {
        match self {
            RecordingState::Idle => "Start recording",
            RecordingState::Recording => "Stop recording",
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "idle"),
            RecordingState::Recording => write!(f, "recording"),
        }
    }
}

/// Summary of a finished recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOutput {
    pub session_id: Uuid,
    pub output_path: PathBuf,
    pub frame_count: u64,
    pub duration_ms: f64,
    pub width: u32,
    pub height: u32,
    pub started_at: DateTime<Utc>,
}

impl RecordingOutput {
    /// Frames per second actually achieved
    pub fn effective_fps(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        self.frame_count as f64 / (self.duration_ms / 1000.0)
    }
}
