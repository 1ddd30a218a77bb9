//! Constants used throughout the application

/// Number of landmarks in the hand model schema
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Values per landmark in the model output (x, y, z)
pub const LANDMARK_OUTPUT_STRIDE: usize = 3;

/// Default camera index (the second enumerated camera)
pub const DEFAULT_CAMERA_INDEX: i32 = 1;

/// Requested capture resolution
pub const DEFAULT_FRAME_WIDTH: i32 = 1280;
pub const DEFAULT_FRAME_HEIGHT: i32 = 720;

/// Minimum hand presence score accepted from the detector
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.75;

/// Default input size of the hand landmark model
pub const DEFAULT_MODEL_INPUT_SIZE: i32 = 224;

/// Default hand landmark model path
pub const DEFAULT_MODEL_PATH: &str = "assets/hand_landmark.onnx";

/// Fingertip distance calibration domain, in pixels
pub const DISTANCE_MIN: f64 = 50.0;
pub const DISTANCE_MAX: f64 = 270.0;

/// Control value output range, in percent
pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;

/// Bar geometry. The fill runs from the bar height down to the baseline.
pub const BAR_LEFT: i32 = 50;
pub const BAR_RIGHT: i32 = 85;
pub const BAR_TOP: i32 = 150;
pub const BAR_BASELINE: i32 = 400;

/// Overlay element sizes
pub const FINGERTIP_RADIUS: i32 = 15;
pub const CONNECTOR_THICKNESS: i32 = 3;
pub const BAR_OUTLINE_THICKNESS: i32 = 3;
pub const LANDMARK_DOT_RADIUS: i32 = 5;

/// Text anchors
pub const PERCENT_TEXT_ORIGIN: (i32, i32) = (50, 450);
pub const FPS_TEXT_ORIGIN: (i32, i32) = (40, 70);

/// Padding applied around the landmark bounding box
pub const BBOX_PADDING: i32 = 20;

/// Display window title
pub const WINDOW_NAME: &str = "Img";

/// Input poll wait per iteration, in milliseconds
pub const INPUT_POLL_MS: i32 = 1;

/// Key codes that request a stop
pub const KEY_ESCAPE: i32 = 27;
pub const KEY_QUIT: i32 = b'q' as i32;

/// Message carried by `DeviceUnavailable` when a video file is exhausted
pub const END_OF_STREAM: &str = "end of stream";

/// Default filter parameters
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;

/// Assumed frame interval for the Kalman model
pub const DEFAULT_FPS: f64 = 30.0;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
