//! Applies the camera to a captured frame
//!
//! A zoomed camera selects a crop rectangle of `frame / zoom` pixels around its
//! center and scales it back up to the full frame size. Near the borders the
//! rectangle is shifted inward instead of clipped, so the magnification stays
//! constant.

use crate::processing::camera::CameraState;
use crate::recorder::channel::CapturedFrame;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

/// Region of the source frame shown by a zoomed camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the crop rectangle for a camera, or `None` when no zoom applies
///
/// Guarantees `x <= frame_width - width` and `y <= frame_height - height`.
pub fn crop_rect(frame_width: u32, frame_height: u32, state: &CameraState) -> Option<CropRect> {
    if !state.is_zoomed() || frame_width == 0 || frame_height == 0 {
        return None;
    }

    let zoom = state.zoom_level;
    let width = ((frame_width as f64 / zoom) as u32).clamp(1, frame_width);
    let height = ((frame_height as f64 / zoom) as u32).clamp(1, frame_height);

    let x = clamp_axis(state.center.0, width, frame_width);
    let y = clamp_axis(state.center.1, height, frame_height);

    Some(CropRect {
        x,
        y,
        width,
        height,
    })
}

fn clamp_axis(center: f64, extent: u32, frame_extent: u32) -> u32 {
    let max_origin = (frame_extent - extent) as f64;
    let origin = (center - (extent / 2) as f64).floor();
    if origin.is_nan() {
        return 0;
    }
    origin.clamp(0.0, max_origin) as u32
}

/// Produce the output frame for the current camera
///
/// Unzoomed cameras pass the frame through untouched.
pub fn compose(frame: CapturedFrame, state: &CameraState) -> CapturedFrame {
    let (width, height) = (frame.width(), frame.height());
    let Some(rect) = crop_rect(width, height, state) else {
        return frame;
    };

    let region = imageops::crop_imm(&frame.image, rect.x, rect.y, rect.width, rect.height).to_image();
    let image = imageops::resize(&region, width, height, FilterType::Triangle);

    CapturedFrame {
        image,
        index: frame.index,
        timestamp_ms: frame.timestamp_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn zoomed(center: (f64, f64), zoom: f64) -> CameraState {
        CameraState {
            center,
            zoom_level: zoom,
            target_center: center,
            target_zoom_level: zoom,
        }
    }

    fn gradient_frame(width: u32, height: u32) -> CapturedFrame {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        CapturedFrame::new(image, 7, 233.3)
    }

    #[test]
    fn test_identity_when_not_zoomed() {
        let frame = gradient_frame(64, 48);
        let original = frame.image.clone();

        let output = compose(frame, &CameraState::at_rest(64, 48));
        assert_eq!(output.image, original);
        assert_eq!(output.index, 7);

        let barely = compose(gradient_frame(64, 48), &zoomed((10.0, 10.0), 1.005));
        assert_eq!(barely.image, original);
    }

    #[test]
    fn test_crop_rect_invariants() {
        let (width, height) = (1920u32, 1080u32);
        let centers = [
            (-500.0, -500.0),
            (0.0, 0.0),
            (10.0, 1070.0),
            (960.0, 540.0),
            (1919.0, 5.0),
            (1920.0, 1080.0),
            (4000.0, 4000.0),
        ];
        let zooms = [1.02, 1.5, 2.0, 2.7, 3.0, 7.5];

        for &center in &centers {
            for &zoom in &zooms {
                let rect = crop_rect(width, height, &zoomed(center, zoom)).unwrap();
                assert!(rect.x <= width - rect.width, "{:?} at {:?}x{}", rect, center, zoom);
                assert!(rect.y <= height - rect.height, "{:?} at {:?}x{}", rect, center, zoom);
                assert!((rect.width as f64 - width as f64 / zoom).abs() <= 1.0);
                assert!((rect.height as f64 - height as f64 / zoom).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_crop_rect_centered() {
        let rect = crop_rect(1920, 1080, &zoomed((960.0, 540.0), 2.0)).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 480,
                y: 270,
                width: 960,
                height: 540
            }
        );
    }

    #[test]
    fn test_crop_rect_shifts_inward_at_edges() {
        let rect = crop_rect(1920, 1080, &zoomed((1900.0, 20.0), 3.0)).unwrap();
        assert_eq!(rect.width, 640);
        assert_eq!(rect.height, 360);
        assert_eq!(rect.x, 1920 - 640);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_crop_rect_none_at_rest() {
        assert!(crop_rect(1920, 1080, &CameraState::at_rest(1920, 1080)).is_none());
    }

    #[test]
    fn test_zoomed_output_keeps_dimensions() {
        let output = compose(gradient_frame(320, 200), &zoomed((100.0, 100.0), 2.5));
        assert_eq!(output.width(), 320);
        assert_eq!(output.height(), 200);
        assert_eq!(output.timestamp_ms, 233.3);
    }

    #[test]
    fn test_zoom_magnifies_region_under_camera() {
        // Left half red, right half blue
        let image = RgbaImage::from_fn(200, 100, |x, _| {
            if x < 100 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let frame = CapturedFrame::new(image, 0, 0.0);

        let output = compose(frame, &zoomed((40.0, 50.0), 3.0));
        for pixel in output.image.pixels() {
            assert_eq!(*pixel, Rgba([255, 0, 0, 255]));
        }
    }
}
