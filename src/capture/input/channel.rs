use crate::capture::input::types::{PointerEvent, PointerEventKind};
use crate::recorder::channel::{RecordingError, RecordingResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

enum InputBackend {
    /// Global OS pointer hooks
    System,
    /// Events fed through a [`PointerInjector`]
    Manual {
        receiver: Option<Receiver<PointerEvent>>,
    },
}

/// Source of pointer events for one recording session
pub struct InputTrackingChannel {
    is_listening: Arc<AtomicBool>,
    backend: InputBackend,
}

/// Hand-driven pointer, paired with a manual [`InputTrackingChannel`]
///
/// Events sent while the channel is not listening are dropped.
#[derive(Clone)]
pub struct PointerInjector {
    sender: Sender<PointerEvent>,
    is_listening: Arc<AtomicBool>,
    start_time: Instant,
}

impl PointerInjector {
    pub fn send(&self, kind: PointerEventKind, x: f64, y: f64) -> bool {
        if !self.is_listening.load(Ordering::SeqCst) {
            return false;
        }
        let process_time_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        self.sender
            .send(PointerEvent::new(kind, x, y, process_time_ms))
            .is_ok()
    }

    pub fn press(&self, x: f64, y: f64) -> bool {
        self.send(PointerEventKind::Press, x, y)
    }

    pub fn release(&self, x: f64, y: f64) -> bool {
        self.send(PointerEventKind::Release, x, y)
    }

    pub fn move_to(&self, x: f64, y: f64) -> bool {
        self.send(PointerEventKind::Move, x, y)
    }
}

impl InputTrackingChannel {
    /// Channel backed by global pointer hooks
    pub fn system() -> Self {
        Self {
            is_listening: Arc::new(AtomicBool::new(false)),
            backend: InputBackend::System,
        }
    }

    /// Channel fed by hand through the returned injector
    pub fn manual() -> (Self, PointerInjector) {
        let (sender, receiver) = mpsc::channel();
        let is_listening = Arc::new(AtomicBool::new(false));
        let injector = PointerInjector {
            sender,
            is_listening: is_listening.clone(),
            start_time: Instant::now(),
        };
        let channel = Self {
            is_listening,
            backend: InputBackend::Manual {
                receiver: Some(receiver),
            },
        };
        (channel, injector)
    }

    /// Begin listening and hand back the event stream
    pub fn start(&mut self) -> RecordingResult<Receiver<PointerEvent>> {
        if self.is_listening.load(Ordering::SeqCst) {
            return Err(RecordingError::AlreadyRecording);
        }

        let receiver = match &mut self.backend {
            InputBackend::System => {
                let (sender, receiver) = mpsc::channel();
                system::attach(sender)?;
                receiver
            }
            InputBackend::Manual { receiver } => receiver.take().ok_or_else(|| {
                RecordingError::ConfigurationError(
                    "Manual input channel can only be started once".to_string(),
                )
            })?,
        };

        self.is_listening.store(true, Ordering::SeqCst);
        tracing::info!("Input tracking started");
        Ok(receiver)
    }

    /// Stop forwarding events
    pub fn stop(&mut self) {
        if !self.is_listening.swap(false, Ordering::SeqCst) {
            return;
        }

        if let InputBackend::System = self.backend {
            system::detach();
        }
        tracing::info!("Input tracking stopped");
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening.load(Ordering::SeqCst)
    }
}

impl Drop for InputTrackingChannel {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(feature = "desktop")]
mod system {
    use super::*;
    use parking_lot::Mutex as ParkingMutex;
    use rdev::EventType;
    use std::sync::OnceLock;

    /// The OS hook cannot be removed once installed, so one listener thread
    /// serves every session and forwards to whichever sender is attached.
    static ACTIVE: ParkingMutex<Option<(Sender<PointerEvent>, Instant)>> = parking_lot::const_mutex(None);
    static LISTENER: OnceLock<()> = OnceLock::new();

    pub fn attach(sender: Sender<PointerEvent>) -> RecordingResult<()> {
        *ACTIVE.lock() = Some((sender, Instant::now()));

        let mut spawn_error = None;
        LISTENER.get_or_init(|| {
            if let Err(e) = std::thread::Builder::new()
                .name("pointer-listener".into())
                .spawn(listen)
            {
                spawn_error = Some(e);
            }
        });

        match spawn_error {
            Some(e) => {
                detach();
                Err(RecordingError::PlatformError(format!(
                    "Failed to start pointer listener: {}",
                    e
                )))
            }
            None => Ok(()),
        }
    }

    pub fn detach() {
        ACTIVE.lock().take();
    }

    fn forward(kind: PointerEventKind, x: f64, y: f64) {
        if let Some((sender, start)) = ACTIVE.lock().as_ref() {
            let process_time_ms = start.elapsed().as_secs_f64() * 1000.0;
            let _ = sender.send(PointerEvent::new(kind, x, y, process_time_ms));
        }
    }

    fn listen() {
        tracing::info!("Global pointer listener started");
        let mut last = (0.0, 0.0);

        let result = rdev::listen(move |event| match event.event_type {
            EventType::MouseMove { x, y } => {
                last = (x, y);
                forward(PointerEventKind::Move, x, y);
            }
            EventType::ButtonPress(_) => forward(PointerEventKind::Press, last.0, last.1),
            EventType::ButtonRelease(_) => forward(PointerEventKind::Release, last.0, last.1),
            _ => {}
        });

        if let Err(e) = result {
            tracing::error!("Global pointer listener failed: {:?}", e);
        }
    }
}

#[cfg(not(feature = "desktop"))]
mod system {
    use super::*;

    pub fn attach(_sender: Sender<PointerEvent>) -> RecordingResult<()> {
        Err(RecordingError::PlatformError(
            "Global pointer tracking requires building with the `desktop` feature".to_string(),
        ))
    }

    pub fn detach() {}
}
