//! Post-recording preview
//!
//! Plays the finished file back in an `ffplay` window. Playback is purely
//! observational; nothing flows back into the recorder.

use crate::recorder::channel::{RecordingError, RecordingResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

/// Width of the preview window; height follows the video's aspect ratio
pub const PREVIEW_WIDTH: u32 = 960;

fn ffplay_args(path: &Path) -> Vec<String> {
    vec![
        "-autoexit".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-window_title".to_string(),
        "Recording Preview".to_string(),
        "-vf".to_string(),
        format!("scale={}:-2", PREVIEW_WIDTH),
        path.to_string_lossy().to_string(),
    ]
}

/// Play `path` and block until the window closes
///
/// Returns `Ok(false)` without opening anything when the file does not exist.
/// Space or `p` pauses, `q` or Esc quits.
pub fn preview_recording(path: &Path) -> RecordingResult<bool> {
    if !path.is_file() {
        tracing::debug!("Nothing to preview at {:?}", path);
        return Ok(false);
    }

    tracing::info!("Previewing {:?}", path);
    let output = Command::new("ffplay")
        .args(ffplay_args(path))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RecordingError::PlatformError(format!("Failed to start ffplay: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RecordingError::PlatformError(format!(
            "ffplay exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(true)
}

/// Run [`preview_recording`] on a short-lived background thread
pub fn launch_preview(path: PathBuf) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = preview_recording(&path) {
            tracing::warn!("Preview failed: {}", e);
        }
    })
}
