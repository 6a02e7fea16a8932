//! Recording session and its capture loop
//!
//! A session owns one dedicated capture thread for its whole lifetime. The
//! thread runs capture -> camera tick -> compose -> encode at a fixed cadence
//! and checks the shared `is_active` flag once per tick. [`RecordingSession::stop`]
//! clears the flag and joins the thread, which finalizes the sink before it
//! exits, so the output file is complete when `stop` returns.

use crate::capture::input::types::{PointerEvent, PointerEventKind, PointerTransform};
use crate::capture::{FrameSource, InputTrackingChannel};
use crate::config::RecordingConfig;
use crate::processing::camera::CameraFollowController;
use crate::processing::compositor::compose;
use crate::recorder::channel::{
    CapturedFrame, FrameSink, RecordingError, RecordingResult, SinkSummary,
};
use crate::recorder::pacing::FramePacer;
use crate::recorder::state::RecordingOutput;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use uuid::Uuid;

/// What the capture thread hands back when it exits
struct LoopOutcome {
    sink: RecordingResult<SinkSummary>,
    error: Option<RecordingError>,
}

/// Everything the capture thread owns exclusively
struct CaptureLoop {
    source: Box<dyn FrameSource>,
    sink: Box<dyn FrameSink>,
    controller: Option<CameraFollowController>,
    pointer_events: Option<Receiver<PointerEvent>>,
    pointer_transform: PointerTransform,
    pacer: FramePacer,
    is_active: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    started: Instant,
}

impl CaptureLoop {
    fn run(mut self) -> LoopOutcome {
        let mut error = None;
        let mut index = 0u64;

        while self.is_active.load(Ordering::SeqCst) {
            let tick_start = Instant::now();

            if let Err(e) = self.tick(index, tick_start) {
                tracing::error!("Capture loop stopped after {} frames: {}", index, e);
                self.is_active.store(false, Ordering::SeqCst);
                error = Some(e);
                break;
            }

            index += 1;
            self.frame_count.store(index, Ordering::SeqCst);
            if index % 60 == 0 {
                tracing::debug!(
                    "Captured {} frames ({:.1}s)",
                    index,
                    self.started.elapsed().as_secs_f64()
                );
            }

            self.pacer.pace(tick_start);
        }

        LoopOutcome {
            sink: self.sink.finish(),
            error,
        }
    }

    fn tick(&mut self, index: u64, tick_start: Instant) -> RecordingResult<()> {
        let timestamp_ms = tick_start.duration_since(self.started).as_secs_f64() * 1000.0;
        self.drain_pointer_events();

        let image = self.source.capture_frame()?;
        let mut frame = CapturedFrame::new(image, index, timestamp_ms);

        if let Some(controller) = self.controller.as_mut() {
            controller.tick();
            frame = compose(frame, &controller.state());
        }

        self.sink.write_frame(frame)
    }

    /// Apply pending pointer events in delivery order
    ///
    /// Press and release are applied as they arrive; move samples are
    /// coalesced so the controller sees one per captured frame. Positions are
    /// mapped into frame pixels first.
    fn drain_pointer_events(&mut self) {
        let (Some(controller), Some(events)) =
            (self.controller.as_mut(), self.pointer_events.as_ref())
        else {
            return;
        };

        let transform = self.pointer_transform;
        let mut latest_move = None;
        for event in events.try_iter().map(|event| transform.apply(event)) {
            match event.kind {
                PointerEventKind::Move => latest_move = Some(event),
                PointerEventKind::Press | PointerEventKind::Release => {
                    controller.on_pointer_event(&event)
                }
            }
        }

        if let Some(event) = latest_move {
            controller.on_pointer_event(&event);
        }
    }
}

/// One start-to-stop recording
pub struct RecordingSession {
    id: Uuid,
    config: RecordingConfig,
    width: u32,
    height: u32,
    is_active: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    input: InputTrackingChannel,
    handle: Option<JoinHandle<LoopOutcome>>,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl RecordingSession {
    /// Spawn the capture thread
    ///
    /// Pointer tracking is best-effort: when it cannot start, the session
    /// records without zoom.
    pub fn start(
        config: RecordingConfig,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        mut input: InputTrackingChannel,
    ) -> RecordingResult<Self> {
        config.validate()?;

        let id = Uuid::new_v4();
        let (width, height) = source.dimensions();
        let pointer_transform = source.pointer_transform();

        let pointer_events = if config.zoom_enabled {
            match input.start() {
                Ok(events) => Some(events),
                Err(e) => {
                    tracing::warn!("Pointer tracking unavailable, recording without zoom: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let controller = config
            .zoom_enabled
            .then(|| CameraFollowController::new(config.smoothing.clone(), width, height));

        let is_active = Arc::new(AtomicBool::new(true));
        let frame_count = Arc::new(AtomicU64::new(0));
        let started = Instant::now();

        let capture_loop = CaptureLoop {
            source,
            sink,
            controller,
            pointer_events,
            pointer_transform,
            pacer: FramePacer::with_budget(config.frame_budget()),
            is_active: is_active.clone(),
            frame_count: frame_count.clone(),
            started,
        };

        let span = tracing::info_span!("recording", session = %id);
        let handle = std::thread::Builder::new()
            .name("capture-loop".into())
            .spawn(move || span.in_scope(|| capture_loop.run()));

        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                input.stop();
                return Err(RecordingError::PlatformError(format!(
                    "Failed to spawn capture thread: {}",
                    e
                )));
            }
        };

        tracing::info!(
            "Recording {} started: {}x{} @ {}fps, zoom {} ({}) -> {:?}",
            id,
            width,
            height,
            config.fps,
            if config.zoom_enabled { "on" } else { "off" },
            config.smoothing.trigger_mode,
            config.output_path
        );

        Ok(Self {
            id,
            config,
            width,
            height,
            is_active,
            frame_count,
            input,
            handle: Some(handle),
            started,
            started_at: Utc::now(),
        })
    }

    /// Stop capturing and wait until the output is finalized
    ///
    /// Blocks for at most one tick plus the time the sink needs to close.
    /// A failure that ended the loop early is reported here.
    pub fn stop(mut self) -> RecordingResult<RecordingOutput> {
        self.is_active.store(false, Ordering::SeqCst);

        let outcome = self
            .handle
            .take()
            .ok_or(RecordingError::NotRecording)?
            .join()
            .map_err(|_| RecordingError::CaptureError("Capture thread panicked".to_string()))?;

        self.input.stop();
        let duration_ms = self.duration_ms();

        let summary = outcome.sink?;
        if let Some(error) = outcome.error {
            return Err(error);
        }

        let output = RecordingOutput {
            session_id: self.id,
            output_path: summary
                .output_path
                .unwrap_or_else(|| self.config.output_path.clone()),
            frame_count: summary.frames_written,
            duration_ms,
            width: self.width,
            height: self.height,
            started_at: self.started_at,
        };

        tracing::info!(
            "Recording {} stopped: {} frames in {:.1}s ({:.1} fps)",
            self.id,
            output.frame_count,
            output.duration_ms / 1000.0,
            output.effective_fps()
        );
        Ok(output)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    /// False once stopped or after the loop hit an error
    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::SeqCst)
    }

    pub fn duration_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        // The thread notices and finalizes on its own; no join here
        self.is_active.store(false, Ordering::SeqCst);
    }
}
