//! Recording control commands

use crate::capture::{get_displays as list_displays, DisplayInfo};
use crate::config::RecordingConfig;
use crate::preview::launch_preview;
use crate::recorder::state::{RecordingOutput, RecordingState};
use crate::recorder::RecordingCoordinator;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::Mutex;

/// Application state for recording
#[derive(Clone)]
pub struct RecorderState {
    pub coordinator: Arc<Mutex<RecordingCoordinator>>,
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::new(RecordingCoordinator::new())
    }
}

impl RecorderState {
    pub fn new(coordinator: RecordingCoordinator) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
        }
    }
}

/// Get list of available displays
pub async fn get_displays() -> Result<Vec<DisplayInfo>, String> {
    Ok(list_displays())
}

/// Start recording
pub async fn start_recording(state: &RecorderState, config: RecordingConfig) -> Result<(), String> {
    let mut coordinator = state.coordinator.lock().await;
    coordinator.start(config).map_err(|e| e.to_string())
}

/// Stop recording
///
/// Joins the capture thread off the async runtime, then opens the preview
/// when the session asked for one.
pub async fn stop_recording(state: &RecorderState) -> Result<RecordingOutput, String> {
    let (output, _preview) = stop_recording_with_preview(state).await?;
    Ok(output)
}

/// Stop recording and hand back the preview thread, if one was launched
///
/// Callers about to exit join the handle so the preview is not cut short.
pub async fn stop_recording_with_preview(
    state: &RecorderState,
) -> Result<(RecordingOutput, Option<JoinHandle<()>>), String> {
    let session = {
        let mut coordinator = state.coordinator.lock().await;
        coordinator.take_session().map_err(|e| e.to_string())?
    };

    let preview = session.config().preview;
    let output = tokio::task::spawn_blocking(move || session.stop())
        .await
        .map_err(|e| format!("Stop task failed: {}", e))?
        .map_err(|e| e.to_string())?;

    let preview = preview.then(|| launch_preview(output.output_path.clone()));
    Ok((output, preview))
}

/// Start when idle, stop when recording; returns the new state
pub async fn toggle_recording(
    state: &RecorderState,
    config: RecordingConfig,
) -> Result<RecordingState, String> {
    match get_recording_state(state).await? {
        RecordingState::Idle => {
            start_recording(state, config).await?;
            Ok(RecordingState::Recording)
        }
        RecordingState::Recording => {
            stop_recording(state).await?;
            Ok(RecordingState::Idle)
        }
    }
}

/// Get current recording state
pub async fn get_recording_state(state: &RecorderState) -> Result<RecordingState, String> {
    let coordinator = state.coordinator.lock().await;
    Ok(coordinator.state())
}

/// Get current recording duration in milliseconds
pub async fn get_recording_duration(state: &RecorderState) -> Result<f64, String> {
    let coordinator = state.coordinator.lock().await;
    Ok(coordinator.duration_ms())
}
