use serde::{Deserialize, Serialize};

/// Kind of pointer transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    Press,
    Release,
    Move,
}

/// A pointer notification, consumed once by the camera controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub kind: PointerEventKind,
    pub process_time_ms: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f64, y: f64, process_time_ms: f64) -> Self {
        Self {
            x,
            y,
            kind,
            process_time_ms,
        }
    }

    pub fn press(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Press, x, y, 0.0)
    }

    pub fn release(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Release, x, y, 0.0)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y, 0.0)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Maps pointer coordinates from the input device's space into frame pixels
///
/// Global pointer hooks report positions in the desktop's coordinate space,
/// which on scaled displays is smaller than the captured image and may be
/// offset by the display's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerTransform {
    pub origin: (f64, f64),
    pub scale: (f64, f64),
}

impl Default for PointerTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PointerTransform {
    pub fn identity() -> Self {
        Self {
            origin: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }

    /// Transform for a display at `origin` whose desktop size is `logical` and
    /// whose captured frames are `physical` pixels
    ///
    /// Falls back to `fallback_scale` on an axis with no logical extent.
    pub fn for_display(
        origin: (i32, i32),
        logical: (u32, u32),
        physical: (u32, u32),
        fallback_scale: f64,
    ) -> Self {
        let axis = |physical: u32, logical: u32| {
            if logical == 0 {
                fallback_scale
            } else {
                physical as f64 / logical as f64
            }
        };

        Self {
            origin: (origin.0 as f64, origin.1 as f64),
            scale: (axis(physical.0, logical.0), axis(physical.1, logical.1)),
        }
    }

    pub fn apply(&self, event: PointerEvent) -> PointerEvent {
        PointerEvent {
            x: (event.x - self.origin.0) * self.scale.0,
            y: (event.y - self.origin.1) * self.scale.1,
            ..event
        }
    }
}
