//! Screen and pointer capture
//!
//! This module defines the contracts the recorder consumes (a frame source and
//! a backend factory) and provides the desktop implementations.

pub mod input;
pub mod screen;

#[cfg(test)]
pub mod fake;

use crate::config::RecordingConfig;
use crate::recorder::channel::{FrameSink, RecordingResult};
use crate::recorder::encoder::FFmpegEncoder;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub use input::{
    InputTrackingChannel, PointerEvent, PointerEventKind, PointerInjector, PointerTransform,
};
pub use screen::get_displays;

/// A display the recorder can capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Supplies full-screen images on demand
pub trait FrameSource: Send {
    /// Size of every image this source returns
    fn dimensions(&self) -> (u32, u32);

    /// Grab the current screen contents
    fn capture_frame(&mut self) -> RecordingResult<RgbaImage>;

    /// How pointer positions map onto this source's pixels
    fn pointer_transform(&self) -> PointerTransform {
        PointerTransform::identity()
    }
}

/// Factory for the collaborators of one recording session
pub trait CaptureBackend: Send + Sync {
    fn open_source(&self) -> RecordingResult<Box<dyn FrameSource>>;

    fn open_sink(
        &self,
        config: &RecordingConfig,
        width: u32,
        height: u32,
    ) -> RecordingResult<Box<dyn FrameSink>>;

    fn input_channel(&self) -> InputTrackingChannel;
}

/// Primary display, FFmpeg encoder and global pointer hooks
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopBackend;

impl CaptureBackend for DesktopBackend {
    fn open_source(&self) -> RecordingResult<Box<dyn FrameSource>> {
        screen::open_primary_display()
    }

    fn open_sink(
        &self,
        config: &RecordingConfig,
        width: u32,
        height: u32,
    ) -> RecordingResult<Box<dyn FrameSink>> {
        let encoder = FFmpegEncoder::new(&config.output_path, width, height, config.fps)?;
        Ok(Box::new(encoder))
    }

    fn input_channel(&self) -> InputTrackingChannel {
        InputTrackingChannel::system()
    }
}

/// Get the backend for the current platform
pub fn get_backend() -> DesktopBackend {
    DesktopBackend
}
