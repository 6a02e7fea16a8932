//! Fake capture collaborators for testing
//!
//! Scripted frame source, in-memory sink and a backend that hands them out, so
//! the recorder can be exercised without a display, FFmpeg or pointer hooks.

use crate::capture::{
    CaptureBackend, FrameSource, InputTrackingChannel, PointerInjector, PointerTransform,
};
use crate::config::RecordingConfig;
use crate::recorder::channel::{
    CapturedFrame, FrameSink, RecordingError, RecordingResult, SinkSummary,
};
use image::{Rgba, RgbaImage};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Frame source producing images from a closure, optionally slow or failing
pub struct FakeFrameSource {
    width: u32,
    height: u32,
    delay: Duration,
    fail_after: Option<u64>,
    paint: fn(u32, u32) -> Rgba<u8>,
    pointer: PointerTransform,
    captured: Arc<AtomicU64>,
}

impl FakeFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            delay: Duration::ZERO,
            fail_after: None,
            paint: |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]),
            pointer: PointerTransform::identity(),
            captured: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Each capture takes at least `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Captures after the first `frames` fail
    pub fn failing_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    pub fn painted(mut self, paint: fn(u32, u32) -> Rgba<u8>) -> Self {
        self.paint = paint;
        self
    }

    /// Pointer positions arrive in a scaled or offset coordinate space
    pub fn with_pointer_transform(mut self, pointer: PointerTransform) -> Self {
        self.pointer = pointer;
        self
    }

    /// Shared count of successful captures
    pub fn counter(&self) -> Arc<AtomicU64> {
        self.captured.clone()
    }
}

impl FrameSource for FakeFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture_frame(&mut self) -> RecordingResult<RgbaImage> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let captured = self.captured.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| captured >= limit) {
            return Err(RecordingError::CaptureError(
                "Fake screen went away".to_string(),
            ));
        }

        self.captured.fetch_add(1, Ordering::SeqCst);
        Ok(RgbaImage::from_fn(self.width, self.height, self.paint))
    }

    fn pointer_transform(&self) -> PointerTransform {
        self.pointer
    }
}

/// Sink that keeps every frame in memory
#[derive(Clone, Default)]
pub struct MemorySink {
    frames: Arc<ParkingMutex<Vec<CapturedFrame>>>,
    finished: Arc<AtomicBool>,
    fail_on_write: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<CapturedFrame> {
        self.frames.lock().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_on_write.store(true, Ordering::SeqCst);
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: CapturedFrame) -> RecordingResult<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(RecordingError::EncodingError("Fake disk is full".to_string()));
        }
        self.frames.lock().push(frame);
        Ok(())
    }

    fn finish(self: Box<Self>) -> RecordingResult<SinkSummary> {
        self.finished.store(true, Ordering::SeqCst);
        Ok(SinkSummary {
            frames_written: self.frames.lock().len() as u64,
            output_path: None,
        })
    }
}

/// Backend handing out fake collaborators
pub struct FakeBackend {
    pub width: u32,
    pub height: u32,
    pub source_fails: bool,
    pub sink_fails: bool,
    pub sink: MemorySink,
    pointer: PointerInjector,
    input: ParkingMutex<Option<InputTrackingChannel>>,
}

impl FakeBackend {
    pub fn new(width: u32, height: u32) -> Self {
        let (input, pointer) = InputTrackingChannel::manual();
        Self {
            width,
            height,
            source_fails: false,
            sink_fails: false,
            sink: MemorySink::new(),
            pointer,
            input: ParkingMutex::new(Some(input)),
        }
    }

    pub fn pointer(&self) -> PointerInjector {
        self.pointer.clone()
    }
}

impl CaptureBackend for FakeBackend {
    fn open_source(&self) -> RecordingResult<Box<dyn FrameSource>> {
        if self.source_fails {
            return Err(RecordingError::PermissionDenied(
                "Fake screen recording permission denied".to_string(),
            ));
        }
        Ok(Box::new(FakeFrameSource::new(self.width, self.height)))
    }

    fn open_sink(
        &self,
        _config: &RecordingConfig,
        _width: u32,
        _height: u32,
    ) -> RecordingResult<Box<dyn FrameSink>> {
        if self.sink_fails {
            return Err(RecordingError::EncodingError(
                "Fake encoder failed to open".to_string(),
            ));
        }
        Ok(Box::new(self.sink.clone()))
    }

    fn input_channel(&self) -> InputTrackingChannel {
        self.input
            .lock()
            .take()
            .unwrap_or_else(|| InputTrackingChannel::manual().0)
    }
}
