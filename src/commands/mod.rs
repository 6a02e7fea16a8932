//! Control surface command handlers
//!
//! Async entry points the front end (the CLI) calls to drive recording.

pub mod recording;
