//! Hand volume control: pinch distance between thumb and index finger drives a volume bar.

use anyhow::{Context, Result};
use clap::Parser;
use hand_volume_control::{app::HandVolumeApp, config::Config};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use [default: 1]
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to process instead of a camera
    #[arg(short, long)]
    video: Option<String>,

    /// Requested capture width [default: 1280]
    #[arg(long)]
    width: Option<i32>,

    /// Requested capture height [default: 720]
    #[arg(long)]
    height: Option<i32>,

    /// Hand landmark ONNX model [default: assets/hand_landmark.onnx]
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Minimum hand presence confidence [default: 0.75]
    #[arg(long)]
    confidence: Option<f32>,

    /// Distance filter (none, kalman, moving_average[:n], median[:n], exponential[:alpha])
    #[arg(short, long)]
    filter: Option<String>,

    /// GUI display mode (all, none)
    #[arg(short, long)]
    gui: Option<String>,

    /// Mirror the camera image (selfie view)
    #[arg(long)]
    mirror: bool,

    /// Draw the detected hand skeleton
    #[arg(long)]
    draw_landmarks: bool,

    /// System volume output (none, pactl)
    #[arg(long)]
    volume: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Command line values take precedence over the configuration file
    fn apply_to(self, config: &mut Config) {
        if let Some(cam) = self.cam {
            config.camera.device_index = cam;
        }
        if self.video.is_some() {
            config.camera.video_file = self.video;
        }
        if let Some(width) = self.width {
            config.camera.width = width;
        }
        if let Some(height) = self.height {
            config.camera.height = height;
        }
        if self.mirror {
            config.camera.mirror = true;
        }
        if let Some(model) = self.model {
            config.detection.model_path = model;
        }
        if let Some(confidence) = self.confidence {
            config.detection.confidence = confidence;
        }
        if self.draw_landmarks {
            config.detection.draw_landmarks = true;
        }
        if let Some(filter) = self.filter {
            config.filter.kind = filter;
        }
        if let Some(gui) = self.gui {
            config.display.gui = gui;
        }
        if self.max_frames.is_some() {
            config.display.max_frames = self.max_frames;
        }
        if let Some(volume) = self.volume {
            config.volume.output = volume;
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Hand Volume Control");

    // Load configuration if provided
    let mut config = match &args.config {
        Some(config_path) => {
            info!("Loading configuration from: {config_path}");
            Config::from_file(config_path).unwrap_or_else(|e| {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            })
        }
        None => Config::default(),
    };

    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    // Create and run application
    let mut app = HandVolumeApp::new(&config).context("Failed to start")?;
    let frames = app.run()?;
    info!("Processed {frames} frames");

    Ok(())
}
