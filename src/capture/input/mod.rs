//! Pointer input tracking
//!
//! Delivers pointer press, release and move notifications to the recorder as a
//! single inbound channel of [`PointerEvent`]s.

pub mod channel;
pub mod types;

pub use channel::{InputTrackingChannel, PointerInjector};
pub use types::{PointerEvent, PointerEventKind, PointerTransform};
