//! Recording and zoom configuration
//!
//! Both structs are immutable for the lifetime of one recording session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Policy deciding when the zoom activates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Zoom in while a mouse button is held down
    #[default]
    Click,
    /// Zoom in proportionally to how fast the pointer moves
    Speed,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Click => write!(f, "click"),
            TriggerMode::Speed => write!(f, "speed"),
        }
    }
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(TriggerMode::Click),
            "speed" => Ok(TriggerMode::Speed),
            other => Err(format!("unknown trigger mode '{}' (expected click or speed)", other)),
        }
    }
}

/// Camera-follow tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingConfig {
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    pub smoothing_factor: f64,
    /// Zoom level used when fully zoomed in
    pub max_zoom: f64,
    /// Minimum per-sample pointer displacement (pixels) that counts as movement
    pub move_threshold: f64,
    /// Speed (pixels per sample) at which the zoom curve reaches ~63% of max
    pub speed_threshold: f64,
    pub trigger_mode: TriggerMode,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.05,
            max_zoom: 3.0,
            move_threshold: 5.0,
            speed_threshold: 100.0,
            trigger_mode: TriggerMode::default(),
        }
    }
}

/// Validation error for a configuration field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ConfigError::new(
                "smoothing_factor",
                "must be greater than 0 and at most 1",
            ));
        }

        if !(self.max_zoom >= 1.0 && self.max_zoom.is_finite()) {
            return Err(ConfigError::new("max_zoom", "must be a finite value of at least 1.0"));
        }

        if !(self.speed_threshold > 0.0) {
            return Err(ConfigError::new("speed_threshold", "must be greater than 0"));
        }

        if !(self.move_threshold >= 0.0) {
            return Err(ConfigError::new("move_threshold", "cannot be negative"));
        }

        Ok(())
    }
}

/// Configuration for a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingConfig {
    /// Output video file
    pub output_path: PathBuf,
    /// Target capture cadence (1-120)
    pub fps: u32,
    /// Apply the mouse-following zoom
    pub zoom_enabled: bool,
    /// Open the preview player once recording stops
    pub preview: bool,
    pub smoothing: SmoothingConfig,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output.mp4"),
            fps: 30,
            zoom_enabled: true,
            preview: true,
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl RecordingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::new("fps", "FPS must be between 1 and 120"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::new("output_path", "Output path cannot be empty"));
        }

        self.smoothing.validate()
    }

    /// Time allotted to one capture tick
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}
