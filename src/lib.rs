//! Hand gesture volume control library.
//!
//! A camera frame is searched for a hand; the distance between the thumb tip
//! and the index fingertip is mapped onto a volume percentage and a bar, which
//! are drawn back onto the frame together with the frame rate.
//!
//! The pipeline consists of:
//! 1. Frame capture from a camera or video file (`OpenCV`)
//! 2. Hand landmark detection with an ONNX model (ONNX Runtime)
//! 3. Pinch extraction from the thumb and index fingertips
//! 4. Optional smoothing and clamped mapping onto percent and bar height
//! 5. Overlay rendering and presentation in a window
//!
//! # Examples
//!
//! ## Mapping a distance
//!
//! ```
//! use hand_volume_control::mapping::ControlMapper;
//!
//! let mapper = ControlMapper::default();
//! let state = mapper.map(160.0);
//! assert!((state.percent - 50.0).abs() < 1e-9);
//! assert!((state.bar_height - 275.0).abs() < 1e-9);
//!
//! // Outside the calibration domain the output is clamped
//! assert_eq!(mapper.map_to_percent(10.0), 0.0);
//! assert_eq!(mapper.map_to_percent(500.0), 100.0);
//! ```
//!
//! ## Running the loop
//!
//! ```no_run
//! use hand_volume_control::{app::HandVolumeApp, config::Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! config.validate()?;
//!
//! let mut app = HandVolumeApp::new(&config)?;
//! let stop = app.stop_signal();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(10));
//!     stop.stop();
//! });
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Frame sources (camera, video file)
pub mod capture;

/// Hand landmark schema
pub mod landmarks;

/// Hand landmark detection
pub mod hand_detection;

/// Thumb/index pinch extraction
pub mod gesture;

/// Distance to control value mapping
pub mod mapping;

/// Frame rate measurement
pub mod rate;

/// Signal filtering algorithms for smoothing the pinch distance
pub mod filters;

/// Overlay drawing
pub mod render;

/// Frame presentation and quit keys
pub mod display;

/// System volume output
pub mod volume;

/// Utility functions for geometry and numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
