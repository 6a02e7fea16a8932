//! Primary-display frame source
//!
//! Uses `xcap` when built with the `desktop` feature. Other builds keep the
//! same functions but report that screen capture is unavailable.

use crate::capture::{DisplayInfo, FrameSource};
use crate::recorder::channel::{RecordingError, RecordingResult};

#[cfg(feature = "desktop")]
pub use platform::ScreenFrameSource;

/// Get list of available displays
pub fn get_displays() -> Vec<DisplayInfo> {
    platform::get_displays()
}

/// Open the primary display and capture one frame from it
///
/// Capturing it surfaces permission and backend failures before a session starts
/// and fixes the frame size to the real pixel size (which differs from the
/// logical size on scaled displays).
pub fn open_primary_display() -> RecordingResult<Box<dyn FrameSource>> {
    platform::open_primary_display()
}

#[cfg(feature = "desktop")]
mod platform {
    use super::*;
    use crate::capture::PointerTransform;
    use image::RgbaImage;
    use std::cell::RefCell;
    use xcap::Monitor;

    thread_local! {
        // Monitor handles are not guaranteed to be `Send`, so each capture
        // thread resolves its own once and keeps it.
        static MONITOR: RefCell<Option<(u32, Monitor)>> = const { RefCell::new(None) };
    }

    pub struct ScreenFrameSource {
        monitor_id: u32,
        width: u32,
        height: u32,
        pointer: PointerTransform,
    }

    fn find_monitor(id: u32) -> RecordingResult<Monitor> {
        let monitors = Monitor::all().map_err(|e| {
            RecordingError::CaptureError(format!("Failed to enumerate displays: {}", e))
        })?;

        monitors
            .into_iter()
            .find(|monitor| monitor.id().ok() == Some(id))
            .ok_or_else(|| RecordingError::CaptureError(format!("Display {} disappeared", id)))
    }

    fn capture_cached(monitor_id: u32) -> RecordingResult<RgbaImage> {
        MONITOR.with(|cached| {
            let mut cached = cached.borrow_mut();
            let resolved = matches!(cached.as_ref(), Some((id, _)) if *id == monitor_id);
            if !resolved {
                *cached = Some((monitor_id, find_monitor(monitor_id)?));
                tracing::debug!("Resolved display {} on capture thread", monitor_id);
            }

            let (_, monitor) = cached.as_ref().ok_or_else(|| {
                RecordingError::CaptureError(format!("Display {} unavailable", monitor_id))
            })?;

            match monitor.capture_image() {
                Ok(image) => Ok(image),
                Err(e) => {
                    cached.take();
                    Err(RecordingError::CaptureError(format!(
                        "Failed to capture screen: {}",
                        e
                    )))
                }
            }
        })
    }

    impl FrameSource for ScreenFrameSource {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn capture_frame(&mut self) -> RecordingResult<RgbaImage> {
            let image = capture_cached(self.monitor_id)?;

            if image.dimensions() != (self.width, self.height) {
                return Err(RecordingError::CaptureError(format!(
                    "Display resolution changed from {}x{} to {}x{}",
                    self.width,
                    self.height,
                    image.width(),
                    image.height()
                )));
            }
            Ok(image)
        }

        fn pointer_transform(&self) -> PointerTransform {
            self.pointer
        }
    }

    pub fn get_displays() -> Vec<DisplayInfo> {
        Monitor::all()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(idx, monitor)| {
                Some(DisplayInfo {
                    id: monitor.id().ok()?,
                    name: monitor
                        .name()
                        .unwrap_or_else(|_| format!("Display {}", idx)),
                    width: monitor.width().unwrap_or(0),
                    height: monitor.height().unwrap_or(0),
                    is_primary: monitor.is_primary().unwrap_or(false),
                })
            })
            .collect()
    }

    pub fn open_primary_display() -> RecordingResult<Box<dyn FrameSource>> {
        let monitors = Monitor::all().map_err(|e| {
            RecordingError::PlatformError(format!("Failed to enumerate displays: {}", e))
        })?;

        let monitor = monitors
            .iter()
            .find(|monitor| monitor.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| RecordingError::CaptureError("No display found".to_string()))?;

        let monitor_id = monitor.id().map_err(|e| {
            RecordingError::PlatformError(format!("Failed to identify display: {}", e))
        })?;

        let sample = monitor.capture_image().map_err(|e| {
            RecordingError::PermissionDenied(format!("Cannot read the screen: {}", e))
        })?;

        // Pointer hooks report desktop coordinates; frames are physical pixels
        let pointer = PointerTransform::for_display(
            (monitor.x().unwrap_or(0), monitor.y().unwrap_or(0)),
            (monitor.width().unwrap_or(0), monitor.height().unwrap_or(0)),
            sample.dimensions(),
            monitor.scale_factor().map(f64::from).unwrap_or(1.0),
        );

        tracing::info!(
            "Display capture initialized for display {} '{}' ({}x{}, pointer scale {:.2}x{:.2})",
            monitor_id,
            monitor.name().unwrap_or_default(),
            sample.width(),
            sample.height(),
            pointer.scale.0,
            pointer.scale.1
        );

        Ok(Box::new(ScreenFrameSource {
            monitor_id,
            width: sample.width(),
            height: sample.height(),
            pointer,
        }))
    }
}

#[cfg(not(feature = "desktop"))]
mod platform {
    use super::*;

    pub fn get_displays() -> Vec<DisplayInfo> {
        vec![]
    }

    pub fn open_primary_display() -> RecordingResult<Box<dyn FrameSource>> {
        Err(RecordingError::PlatformError(
            "Screen capture requires building with the `desktop` feature".to_string(),
        ))
    }
}
