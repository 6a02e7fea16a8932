//! Per-frame zoom processing
//!
//! The camera controller turns pointer activity into a smoothed view
//! (center and magnification); the compositor applies that view to each
//! captured frame.

pub mod camera;
pub mod compositor;
pub mod smoothing;

pub use camera::{CameraFollowController, CameraState};
pub use compositor::{compose, crop_rect, CropRect};
pub use smoothing::{Smoothed2D, SmoothedValue};
