//! Main application module for hand volume control.

use crate::{
    capture::{CaptureSource, FrameSource, VideoSource},
    config::Config,
    constants::DEFAULT_DETECTION_CONFIDENCE,
    display::{Headless, Presenter, Window},
    error::{Error, Result},
    filters::{DistanceFilter, NoFilter},
    gesture::{self, GestureMetrics},
    hand_detection::{HandDetector, OnnxHandDetector},
    mapping::{ControlMapper, ControlState},
    rate::{Clock, RateMonitor, SystemClock},
    render::Renderer,
    volume::{create_volume_sink, NullVolume, VolumeSink},
};
use log::{debug, info, trace, warn};
use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Show the camera window
    All,
    /// No GUI (headless)
    None,
}

impl FromStr for GuiMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            other => Err(Error::ConfigError(format!("Unknown GUI mode: {other}"))),
        }
    }
}

/// Shared flag that ends the loop before its next capture
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop; may be called from any thread
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Values carried from one iteration to the next
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    /// Last mapped control, held while no hand is visible
    pub control: ControlState,
    /// Frame rate monitor
    pub rate: RateMonitor,
    /// FPS reported for the last frame
    pub fps: Option<f64>,
    /// Whether the last frame had a hand
    pub hand_present: bool,
    /// Frames completed
    pub frames: u64,
}

/// Result of a single iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Pinch geometry, if a hand was detected
    pub metrics: Option<GestureMetrics>,
    /// Control value drawn on this frame
    pub control: ControlState,
    /// Instantaneous frame rate
    pub fps: Option<f64>,
    /// The presenter asked to quit
    pub quit: bool,
}

/// Main application struct
pub struct HandVolumeApp {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    presenter: Box<dyn Presenter>,
    volume: Box<dyn VolumeSink>,
    clock: Box<dyn Clock>,
    filter: Box<dyn DistanceFilter>,
    mapper: ControlMapper,
    renderer: Renderer,
    confidence: f32,
    max_frames: Option<u64>,
    stop: StopSignal,
    state: LoopState,
}

impl HandVolumeApp {
    /// Build the application from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device, model, window, filter or
    /// volume output cannot be set up.
    pub fn new(config: &Config) -> Result<Self> {
        info!("Initializing Hand Volume Control application");

        let video_source = match &config.camera.video_file {
            Some(path) => VideoSource::File(path.clone()),
            None => VideoSource::Camera(config.camera.device_index),
        };
        let source = CaptureSource::from_source(&video_source, config.camera.width, config.camera.height)?
            .with_mirror(config.camera.mirror)
            .with_read_retries(config.camera.read_retries);

        let detector = OnnxHandDetector::new(&config.detection.model_path)?
            .with_draw(config.detection.draw_landmarks)
            .with_logit_scores(config.detection.scores_are_logits);

        let presenter: Box<dyn Presenter> = match config.display.gui.parse::<GuiMode>()? {
            GuiMode::All => Box::new(Window::open(&config.display.window_name)?),
            GuiMode::None => {
                info!("Running headless");
                Box::new(Headless::new())
            }
        };

        let filter = config.create_filter()?;
        info!("Distance filter: {}", filter.name());

        let volume = create_volume_sink(&config.volume.output)?;
        info!("Volume output: {}", volume.name());

        Ok(Self::with_components(Box::new(source), Box::new(detector))
            .with_presenter(presenter)
            .with_volume(volume)
            .with_filter(filter)
            .with_mapper(config.create_mapper()?)
            .with_confidence(config.detection.confidence)
            .with_max_frames(config.display.max_frames))
    }

    /// Assemble the loop around a source and a detector
    ///
    /// Defaults to a headless presenter, no volume output, the system clock,
    /// no smoothing and the reference calibration.
    #[must_use]
    pub fn with_components(source: Box<dyn FrameSource>, detector: Box<dyn HandDetector>) -> Self {
        Self {
            source,
            detector,
            presenter: Box::new(Headless::new()),
            volume: Box::new(NullVolume),
            clock: Box::new(SystemClock),
            filter: Box::new(NoFilter),
            mapper: ControlMapper::default(),
            renderer: Renderer,
            confidence: DEFAULT_DETECTION_CONFIDENCE,
            max_frames: None,
            stop: StopSignal::new(),
            state: LoopState::default(),
        }
    }

    #[must_use]
    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: Box<dyn VolumeSink>) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn DistanceFilter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: ControlMapper) -> Self {
        self.mapper = mapper;
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Handle for stopping the loop from elsewhere
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &LoopState {
        &self.state
    }

    /// Run one capture-to-present iteration
    ///
    /// Without a hand the previous control value is drawn again and the
    /// filter is reset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] when no frame can be read, or any
    /// detection or drawing error.
    pub fn step(&mut self) -> Result<FrameOutcome> {
        let mut frame = self.source.read_frame()?;
        let detection = self.detector.detect(&frame, self.confidence)?;
        let metrics = gesture::extract(&detection.landmarks);

        if let Some(m) = &metrics {
            let distance = self.filter.apply(m.distance);
            self.state.control = self.mapper.map(distance);
            trace!(
                "Distance {:.1} -> {:.1}% (bar {:.1})",
                distance,
                self.state.control.percent,
                self.state.control.bar_height
            );

            if let Err(e) = self.volume.apply(self.state.control.percent) {
                warn!("Failed to apply volume: {e}");
            }
        } else if self.state.hand_present {
            debug!("Hand lost, holding {:.1}%", self.state.control.percent);
            self.filter.reset();
        }
        self.state.hand_present = metrics.is_some();

        let fps = self.state.rate.tick(self.clock.now());
        self.state.fps = fps;

        self.renderer.render(
            &mut frame,
            &detection.annotations,
            metrics.as_ref(),
            &self.state.control,
            fps,
        )?;
        let quit = self.presenter.present(&frame)?;
        self.state.frames += 1;

        Ok(FrameOutcome {
            metrics,
            control: self.state.control,
            fps,
            quit,
        })
    }

    /// Run the main application loop
    ///
    /// Returns the number of frames processed. The loop ends cleanly on a
    /// stop request, a quit key, the frame limit or the end of a video file.
    ///
    /// # Errors
    ///
    /// Any other error from [`Self::step`] ends the loop and is returned.
    pub fn run(&mut self) -> Result<u64> {
        info!("Starting main application loop");

        loop {
            if self.stop.is_stopped() {
                info!("Stop requested");
                break;
            }
            if self.max_frames.is_some_and(|max| self.state.frames >= max) {
                info!("Frame limit of {} reached", self.state.frames);
                break;
            }

            match self.step() {
                Ok(outcome) if outcome.quit => {
                    info!("Exit requested by user");
                    self.stop.stop();
                }
                Ok(_) => {}
                Err(e) if e.is_end_of_stream() => {
                    info!("End of video stream reached");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        info!("Application shutting down after {} frames", self.state.frames);
        Ok(self.state.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture::FrameQueue, hand_detection::ScriptedDetector, landmarks::LandmarkSet, rate::ManualClock};
    use opencv::{
        core::{Mat, CV_8UC3},
        prelude::*,
    };

    fn frames(n: usize) -> Vec<Mat> {
        (0..n)
            .map(|_| Mat::zeros(480, 640, CV_8UC3).unwrap().to_mat().unwrap())
            .collect()
    }

    fn pinch(distance: i32) -> LandmarkSet {
        let mut points = vec![(200, 200); 21];
        points[4] = (200, 200);
        points[8] = (200 + distance, 200);
        LandmarkSet::from_points(&points).unwrap()
    }

    #[test]
    fn test_gui_mode_parsing() {
        assert_eq!("all".parse::<GuiMode>().unwrap(), GuiMode::All);
        assert_eq!("NONE".parse::<GuiMode>().unwrap(), GuiMode::None);
        assert!("camera".parse::<GuiMode>().is_err());
    }

    #[test]
    fn test_stop_signal_is_shared() {
        let signal = StopSignal::new();
        let handle = signal.clone();
        assert!(!signal.is_stopped());
        handle.stop();
        assert!(signal.is_stopped());
    }

    #[test]
    fn test_step_maps_distance() {
        let mut app = HandVolumeApp::with_components(
            Box::new(FrameQueue::new(frames(1))),
            Box::new(ScriptedDetector::new(vec![pinch(160)])),
        )
        .with_clock(Box::new(ManualClock::new(vec![0.5])));

        let outcome = app.step().unwrap();
        assert!(outcome.metrics.is_some());
        assert!((outcome.control.percent - 50.0).abs() < 1e-9);
        assert!((outcome.control.bar_height - 275.0).abs() < 1e-9);
        assert_eq!(outcome.fps, Some(2.0));
        assert_eq!(app.state().frames, 1);
    }

    #[test]
    fn test_run_ends_at_frame_limit() {
        let mut app = HandVolumeApp::with_components(
            Box::new(FrameQueue::new(frames(5))),
            Box::new(ScriptedDetector::new(vec![])),
        )
        .with_max_frames(Some(3));

        assert_eq!(app.run().unwrap(), 3);
    }
}
