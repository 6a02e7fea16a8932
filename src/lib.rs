//! FocusFlow - screen recordings that zoom in on what you are doing.
//!
//! This is the main library crate for the FocusFlow recorder. It captures the
//! primary display at a fixed frame rate, follows the mouse with a smoothed
//! digital zoom, encodes the result with FFmpeg and previews it afterwards.

pub mod capture;
pub mod commands;
pub mod config;
pub mod preview;
pub mod processing;
pub mod recorder;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{RecordingConfig, SmoothingConfig, TriggerMode};
pub use recorder::{RecordingCoordinator, RecordingError, RecordingOutput, RecordingState};

/// Initialize tracing/logging
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focusflow=info,focusflow_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting FocusFlow v{}", env!("CARGO_PKG_VERSION"));
}
