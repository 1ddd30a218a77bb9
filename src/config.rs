//! Configuration management for the hand volume control application

use crate::{
    constants::{
        DEFAULT_CAMERA_INDEX, DEFAULT_DETECTION_CONFIDENCE, DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_FRAME_HEIGHT,
        DEFAULT_FRAME_WIDTH, DEFAULT_MEDIAN_WINDOW, DEFAULT_MODEL_PATH, DEFAULT_MOVING_AVERAGE_WINDOW, DISTANCE_MAX,
        DISTANCE_MIN, WINDOW_NAME,
    },
    filters::DistanceFilter,
    mapping::ControlMapper,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture configuration
    pub camera: CameraConfig,

    /// Hand detection configuration
    pub detection: DetectionConfig,

    /// Distance calibration
    pub mapping: MappingConfig,

    /// Distance smoothing
    pub filter: FilterConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// System volume output
    pub volume: VolumeConfig,
}

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index
    pub device_index: i32,

    /// Requested frame width
    pub width: i32,

    /// Requested frame height
    pub height: i32,

    /// Read frames from this video file instead of the camera
    pub video_file: Option<String>,

    /// Flip frames horizontally (selfie view)
    pub mirror: bool,

    /// Extra attempts after a failed camera read
    pub read_retries: u32,
}

/// Hand detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Path to the hand landmark ONNX model
    pub model_path: PathBuf,

    /// Minimum hand presence score (0.0-1.0)
    pub confidence: f32,

    /// Draw the hand skeleton
    pub draw_landmarks: bool,

    /// Model emits raw logits for presence and handedness
    pub scores_are_logits: bool,
}

/// Fingertip distance calibration, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Distance mapped to 0 %
    pub distance_min: f64,

    /// Distance mapped to 100 %
    pub distance_max: f64,
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter type: none, moving_average, median, exponential or kalman
    pub kind: String,

    /// Moving average window size
    pub moving_average_window: usize,

    /// Median filter window size
    pub median_window: usize,

    /// Exponential filter alpha value
    pub exponential_alpha: f64,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// GUI mode: all or none
    pub gui: String,

    /// Window title
    pub window_name: String,

    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

/// System volume output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Output: none or pactl
    pub output: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: DEFAULT_CAMERA_INDEX,
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            video_file: None,
            mirror: false,
            read_retries: 0,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence: DEFAULT_DETECTION_CONFIDENCE,
            draw_landmarks: false,
            scores_are_logits: true,
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            distance_min: DISTANCE_MIN,
            distance_max: DISTANCE_MAX,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "none".to_string(),
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            median_window: DEFAULT_MEDIAN_WINDOW,
            exponential_alpha: DEFAULT_EXPONENTIAL_ALPHA,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gui: "all".to_string(),
            window_name: WINDOW_NAME.to_string(),
            max_frames: None,
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            output: "none".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] on malformed YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the distance filter from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterError`] for an unknown kind or bad parameters.
    pub fn create_filter(&self) -> Result<Box<dyn DistanceFilter>> {
        use crate::filters::{
            create_filter, exponential::ExponentialFilter, median::MedianFilter,
            moving_average::MovingAverageFilter,
        };

        match self.filter.kind.as_str() {
            "moving_average" => Ok(Box::new(MovingAverageFilter::new(self.filter.moving_average_window))),
            "median" => Ok(Box::new(MedianFilter::new(self.filter.median_window))),
            "exponential" => Ok(Box::new(ExponentialFilter::try_new(self.filter.exponential_alpha)?)),
            spec => create_filter(spec),
        }
    }

    /// Create the distance mapper from the calibration section
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite or empty distance domain.
    pub fn create_mapper(&self) -> Result<ControlMapper> {
        ControlMapper::with_domain(self.mapping.distance_min, self.mapping.distance_max)
    }

    /// Validate configuration
    ///
    /// Model presence is not checked here; the detector reports a missing
    /// model when it is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.camera.width <= 0 || self.camera.height <= 0 {
            return Err(Error::ConfigError(format!(
                "Capture resolution must be positive, got {}x{}",
                self.camera.width, self.camera.height
            )));
        }

        if !(0.0..=1.0).contains(&self.detection.confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        self.create_mapper()
            .map_err(|e| Error::ConfigError(format!("Invalid mapping: {e}")))?;

        if self.filter.moving_average_window == 0 {
            return Err(Error::ConfigError(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        if self.filter.median_window == 0 || self.filter.median_window % 2 == 0 {
            return Err(Error::ConfigError(
                "Median window size must be odd and greater than 0".to_string(),
            ));
        }
        if !(self.filter.exponential_alpha > 0.0 && self.filter.exponential_alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Exponential alpha must be in (0.0, 1.0]".to_string(),
            ));
        }
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid filter: {e}")))?;

        if !matches!(self.display.gui.as_str(), "all" | "none") {
            return Err(Error::ConfigError(format!("Unknown GUI mode: {}", self.display.gui)));
        }

        if !matches!(self.volume.output.as_str(), "none" | "pactl") {
            return Err(Error::ConfigError(format!("Unknown volume output: {}", self.volume.output)));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Volume Control Configuration

# Capture
camera:
  device_index: 1
  width: 1280
  height: 720
  mirror: false
  read_retries: 0

# Hand detection
detection:
  model_path: "assets/hand_landmark.onnx"
  confidence: 0.75
  draw_landmarks: false
  scores_are_logits: true

# Thumb-to-index distance mapped onto 0-100 %
mapping:
  distance_min: 50.0
  distance_max: 270.0

# Distance smoothing (none, moving_average, median, exponential, kalman)
filter:
  kind: "none"
  moving_average_window: 5
  median_window: 5
  exponential_alpha: 0.5

# Display settings
display:
  gui: "all"
  window_name: "Img"

# System volume (none, pactl)
volume:
  output: "none"
"#;
