//! FFmpeg-backed encoder sink
//!
//! Raw RGBA frames are piped to an `ffmpeg` child process over stdin and
//! encoded as MPEG-4 into the requested container. The output file is only
//! complete after [`FrameSink::finish`] has waited for FFmpeg to exit.

use crate::recorder::channel::{CapturedFrame, FrameSink, RecordingError, RecordingResult, SinkSummary};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Check whether an `ffmpeg` binary is on `PATH`
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

pub struct FFmpegEncoder {
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    frame_count: u64,
    output_path: PathBuf,
    width: u32,
    height: u32,
}

impl FFmpegEncoder {
    pub fn new(output_path: &Path, width: u32, height: u32, fps: u32) -> RecordingResult<Self> {
        if !ffmpeg_available() {
            return Err(RecordingError::ConfigurationError(
                "FFmpeg not found. Please install FFmpeg and make sure it is on PATH".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(RecordingError::ConfigurationError(format!(
                "Invalid frame size {}x{}",
                width, height
            )));
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let size = format!("{width}x{height}");
        let rate = fps.to_string();
        let output = output_path.to_string_lossy().to_string();

        let mut args: Vec<&str> = vec![
            "-y",                   // Overwrite output
            "-loglevel", "error",   // Keep the stderr pipe small
            "-f", "rawvideo",
            "-pixel_format", "rgba",
            "-video_size", &size,
            "-framerate", &rate,
            "-i", "-",              // Read from stdin
            "-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2", // yuv420p needs even dimensions
            "-c:v", "mpeg4",        // MPEG-4 Part 2, tagged mp4v in .mp4
            "-q:v", "3",
            "-pix_fmt", "yuv420p",
        ];
        if is_mp4_family(output_path) {
            args.extend(["-movflags", "+faststart"]);
        }
        args.push(&output);

        let mut process = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecordingError::EncodingError(format!("Failed to start FFmpeg: {}", e)))?;

        let stdin = process.stdin.take().ok_or_else(|| {
            RecordingError::EncodingError("FFmpeg stdin was not captured".to_string())
        })?;

        tracing::info!(
            "Started FFmpeg encoder: {}x{} @ {}fps -> {:?}",
            width,
            height,
            fps,
            output_path
        );

        Ok(Self {
            process: Some(process),
            stdin: Some(stdin),
            frame_count: 0,
            output_path: output_path.to_path_buf(),
            width,
            height,
        })
    }
}

fn is_mp4_family(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "mp4" | "m4v" | "mov"))
        .unwrap_or(false)
}

impl FrameSink for FFmpegEncoder {
    fn write_frame(&mut self, frame: CapturedFrame) -> RecordingResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(RecordingError::EncodingError(format!(
                "Frame size {}x{} does not match encoder size {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| RecordingError::EncodingError("Encoder already finished".to_string()))?;

        stdin.write_all(frame.as_bytes()).map_err(|e| {
            RecordingError::EncodingError(format!("FFmpeg stopped accepting frames: {}", e))
        })?;

        self.frame_count += 1;
        if self.frame_count % 60 == 0 {
            tracing::debug!(
                "Encoded {} frames at {}x{}",
                self.frame_count,
                self.width,
                self.height
            );
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> RecordingResult<SinkSummary> {
        // Closing stdin signals EOF
        drop(self.stdin.take());

        if let Some(process) = self.process.take() {
            let output = process.wait_with_output()?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(RecordingError::EncodingError(format!(
                    "FFmpeg exited with status {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }
        }

        tracing::info!(
            "FFmpeg finished: {} frames written to {:?}",
            self.frame_count,
            self.output_path
        );

        Ok(SinkSummary {
            frames_written: self.frame_count,
            output_path: Some(self.output_path.clone()),
        })
    }
}

impl Drop for FFmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut process) = self.process.take() {
            let _ = process.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_mp4_family_detection() {
        assert!(is_mp4_family(Path::new("out.mp4")));
        assert!(is_mp4_family(Path::new("clip.MOV")));
        assert!(!is_mp4_family(Path::new("clip.mkv")));
        assert!(!is_mp4_family(Path::new("noext")));
    }

    #[test]
    fn test_encodes_frames_to_file() {
        if !ffmpeg_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clip.mp4");
        let mut encoder: Box<FFmpegEncoder> = Box::new(FFmpegEncoder::new(&path, 65, 47, 30).unwrap());

        for index in 0..10u64 {
            let image = RgbaImage::from_pixel(65, 47, Rgba([index as u8 * 20, 80, 160, 255]));
            encoder
                .write_frame(CapturedFrame::new(image, index, index as f64 * 33.3))
                .unwrap();
        }

        let summary = encoder.finish().unwrap();
        assert_eq!(summary.frames_written, 10);
        assert_eq!(summary.output_path.as_deref(), Some(path.as_path()));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_rejects_mismatched_frame_size() {
        if !ffmpeg_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut encoder = FFmpegEncoder::new(&path, 32, 32, 30).unwrap();

        let frame = CapturedFrame::new(RgbaImage::new(16, 16), 0, 0.0);
        assert!(matches!(
            encoder.write_frame(frame),
            Err(RecordingError::EncodingError(_))
        ));
    }
}
