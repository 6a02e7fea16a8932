use anyhow::Context;
use clap::Parser;
use focusflow_lib::commands::recording::{
    get_displays, get_recording_state, stop_recording_with_preview, toggle_recording,
    RecorderState,
};
use focusflow_lib::{RecordingConfig, RecordingState, SmoothingConfig, TriggerMode};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Record the screen with a zoom that follows the mouse
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output video file
    #[arg(short, long, default_value = "output.mp4")]
    output: PathBuf,

    /// Capture frame rate (1-120)
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Zoom trigger: click or speed
    #[arg(long, default_value_t = TriggerMode::Click)]
    trigger: TriggerMode,

    /// Magnification when fully zoomed in
    #[arg(long, default_value_t = 3.0)]
    max_zoom: f64,

    /// Fraction of the remaining distance the camera covers per frame
    #[arg(long, default_value_t = 0.05)]
    smoothing: f64,

    /// Pointer displacement (pixels) that counts as movement in speed mode
    #[arg(long, default_value_t = 5.0)]
    move_threshold: f64,

    /// Pointer speed scale for the speed-mode zoom curve
    #[arg(long, default_value_t = 100.0)]
    speed_threshold: f64,

    /// Record without zooming
    #[arg(long)]
    no_zoom: bool,

    /// Do not play the recording back after stopping
    #[arg(long)]
    no_preview: bool,

    /// Print the available displays and exit
    #[arg(long)]
    list_displays: bool,
}

impl Args {
    fn recording_config(&self) -> RecordingConfig {
        RecordingConfig {
            output_path: self.output.clone(),
            fps: self.fps,
            zoom_enabled: !self.no_zoom,
            preview: !self.no_preview,
            smoothing: SmoothingConfig {
                smoothing_factor: self.smoothing,
                max_zoom: self.max_zoom,
                move_threshold: self.move_threshold,
                speed_threshold: self.speed_threshold,
                trigger_mode: self.trigger,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    focusflow_lib::init_logging();

    if args.list_displays {
        let displays = get_displays().await.map_err(anyhow::Error::msg)?;
        if displays.is_empty() {
            println!("No displays available");
        }
        for display in displays {
            println!(
                "{}: {} {}x{}{}",
                display.id,
                display.name,
                display.width,
                display.height,
                if display.is_primary { " (primary)" } else { "" }
            );
        }
        return Ok(());
    }

    let config = args.recording_config();
    config.validate().context("invalid recording options")?;

    let state = RecorderState::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("[{}]  Enter toggles, q quits", RecordingState::Idle.toggle_label());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.context("failed to read stdin")?;
                match line.as_deref().map(str::trim) {
                    None | Some("q") | Some("quit") => break,
                    Some(_) => match toggle_recording(&state, config.clone()).await {
                        Ok(next) => println!("[{}]", next.toggle_label()),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            let current = get_recording_state(&state).await.map_err(anyhow::Error::msg)?;
                            println!("[{}]", current.toggle_label());
                        }
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if get_recording_state(&state).await.map_err(anyhow::Error::msg)? == RecordingState::Recording {
        match stop_recording_with_preview(&state).await {
            Ok((output, preview)) => {
                println!(
                    "Saved {} frames to {}",
                    output.frame_count,
                    output.output_path.display()
                );
                // Stay alive until the preview window closes
                if let Some(preview) = preview {
                    tokio::task::spawn_blocking(move || preview.join())
                        .await
                        .context("preview task failed")?
                        .map_err(|_| anyhow::anyhow!("preview thread panicked"))?;
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}
