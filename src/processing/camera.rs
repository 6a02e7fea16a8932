//! Virtual camera that follows pointer activity
//!
//! The controller turns raw pointer events into a target (center, zoom) and,
//! once per captured frame, eases the visible camera toward that target with
//! exponential smoothing. Out-of-bounds input is clamped, never rejected.

use crate::capture::input::types::{PointerEvent, PointerEventKind};
use crate::config::{SmoothingConfig, TriggerMode};
use crate::processing::smoothing::{Smoothed2D, SmoothedValue};
use serde::{Deserialize, Serialize};

/// Zoom levels at or below `1.0 + ZOOM_EPSILON` are treated as no zoom
pub const ZOOM_EPSILON: f64 = 0.01;

/// Snapshot of the virtual camera, in source-frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub center: (f64, f64),
    /// Always >= 1.0 (1.0 = no magnification)
    pub zoom_level: f64,
    pub target_center: (f64, f64),
    pub target_zoom_level: f64,
}

impl CameraState {
    /// Unzoomed camera looking at the middle of the frame
    pub fn at_rest(width: u32, height: u32) -> Self {
        let center = (width as f64 / 2.0, height as f64 / 2.0);
        Self {
            center,
            zoom_level: 1.0,
            target_center: center,
            target_zoom_level: 1.0,
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom_level > 1.0 + ZOOM_EPSILON
    }
}

/// Map a pointer speed onto a zoom level
///
/// `1 + (max_zoom - 1) * (1 - e^(-speed / speed_threshold))`, clamped to
/// `[1, max_zoom]`.
pub fn speed_to_zoom(speed: f64, speed_threshold: f64, max_zoom: f64) -> f64 {
    let max_zoom = max_zoom.max(1.0);
    let zoom = 1.0 + (max_zoom - 1.0) * (1.0 - (-speed / speed_threshold).exp());
    zoom.clamp(1.0, max_zoom)
}

/// Euclidean distance between two pointer positions
pub fn displacement(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}

pub struct CameraFollowController {
    config: SmoothingConfig,
    bounds: (f64, f64),
    center: Smoothed2D,
    zoom: SmoothedValue,
    target_center: (f64, f64),
    target_zoom: f64,
    /// Previous pointer sample, for speed detection
    last_position: Option<(f64, f64)>,
    /// Where the most recent press happened; the camera holds it on release
    last_press: Option<(f64, f64)>,
}

impl CameraFollowController {
    /// Create a controller for a `width` x `height` source frame
    pub fn new(config: SmoothingConfig, width: u32, height: u32) -> Self {
        let rest = CameraState::at_rest(width, height);
        Self {
            config,
            bounds: (width as f64, height as f64),
            center: Smoothed2D::new(rest.center.0, rest.center.1),
            zoom: SmoothedValue::new(1.0),
            target_center: rest.center,
            target_zoom: 1.0,
            last_position: None,
            last_press: None,
        }
    }

    /// Clamp into the frame; a non-finite coordinate keeps the current center
    fn clamp_point(&self, point: (f64, f64)) -> (f64, f64) {
        let (cx, cy) = self.center.position();
        let x = if point.0.is_finite() { point.0 } else { cx };
        let y = if point.1.is_finite() { point.1 } else { cy };
        (x.clamp(0.0, self.bounds.0), y.clamp(0.0, self.bounds.1))
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(1.0, self.config.max_zoom.max(1.0))
    }

    /// Update the target according to the active trigger mode
    pub fn on_pointer_event(&mut self, event: &PointerEvent) {
        let position = self.clamp_point(event.position());

        match (self.config.trigger_mode, event.kind) {
            (TriggerMode::Click, PointerEventKind::Press) => {
                self.last_press = Some(position);
                self.target_zoom = self.clamp_zoom(self.config.max_zoom);
                self.target_center = position;
            }
            (TriggerMode::Click, PointerEventKind::Release) => {
                self.target_zoom = 1.0;
                self.target_center = self.last_press.unwrap_or(position);
            }
            (TriggerMode::Click, PointerEventKind::Move) => {
                self.last_position = Some(position);
            }
            (TriggerMode::Speed, PointerEventKind::Move) => {
                if let Some(previous) = self.last_position {
                    let speed = displacement(previous, position);
                    if speed > self.config.move_threshold {
                        self.target_zoom = self.clamp_zoom(speed_to_zoom(
                            speed,
                            self.config.speed_threshold,
                            self.config.max_zoom,
                        ));
                        self.target_center = position;
                    }
                }
                self.last_position = Some(position);
            }
            (TriggerMode::Speed, PointerEventKind::Press | PointerEventKind::Release) => {}
        }
    }

    /// Advance the camera one frame toward its target
    pub fn tick(&mut self) {
        let factor = self.config.smoothing_factor;
        self.center.step(self.target_center, factor);
        self.zoom.step(self.target_zoom, factor);

        let (x, y) = self.clamp_point(self.center.position());
        self.center.reset(x, y);
        self.zoom.value = self.clamp_zoom(self.zoom.value);
    }

    /// Move the camera and its target to a point without easing
    pub fn snap_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.clamp_point((x, y));
        self.center.reset(x, y);
        self.target_center = (x, y);
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            center: self.center.position(),
            zoom_level: self.clamp_zoom(self.zoom.value),
            target_center: self.target_center,
            target_zoom_level: self.target_zoom,
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.state().is_zoomed()
    }

    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.center.is_settled(self.target_center, epsilon)
            && self.zoom.is_settled(self.target_zoom, epsilon)
    }
}
