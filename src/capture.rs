//! Frame sources: a camera device or a video file through `OpenCV`.

use crate::{constants::END_OF_STREAM, Error, Result};
use log::{debug, info, warn};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Anything that yields frames one at a time
pub trait FrameSource {
    /// Read the next frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] when no frame can be produced.
    fn read_frame(&mut self) -> Result<Mat>;
}

/// `OpenCV` capture handle, released when dropped
pub struct CaptureSource {
    source: VideoSource,
    capture: VideoCapture,
    mirror: bool,
    read_retries: u32,
    reported_size: bool,
}

impl CaptureSource {
    /// Open a camera and request a capture resolution
    ///
    /// The device may pick a different resolution; the size actually
    /// delivered is logged with the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the device cannot be opened.
    pub fn open(device_index: i32, width: i32, height: i32) -> Result<Self> {
        info!("Opening camera {device_index} at {width}x{height}");
        let mut capture = VideoCapture::new(device_index, videoio::CAP_ANY)
            .map_err(|e| Error::DeviceUnavailable(format!("camera {device_index}: {e}")))?;

        if !capture.is_opened()? {
            return Err(Error::DeviceUnavailable(format!("camera {device_index} could not be opened")));
        }

        capture.set(CAP_PROP_FRAME_WIDTH, f64::from(width))?;
        capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(height))?;

        // Reduce buffer size for lower latency (webcam only)
        if !capture.set(CAP_PROP_BUFFERSIZE, 1.0)? {
            debug!("Camera ignored buffer size request");
        }

        Ok(Self {
            source: VideoSource::Camera(device_index),
            capture,
            mirror: false,
            read_retries: 0,
            reported_size: false,
        })
    }

    /// Open a video file
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the file cannot be opened.
    pub fn open_file(path: &str) -> Result<Self> {
        info!("Opening video file: {path}");
        let capture = VideoCapture::from_file(path, videoio::CAP_ANY)
            .map_err(|e| Error::DeviceUnavailable(format!("{path}: {e}")))?;

        if !capture.is_opened()? {
            return Err(Error::DeviceUnavailable(format!("video file {path} could not be opened")));
        }

        Ok(Self {
            source: VideoSource::File(path.to_string()),
            capture,
            mirror: false,
            read_retries: 0,
            reported_size: false,
        })
    }

    /// Open whichever source is configured
    ///
    /// # Errors
    ///
    /// Same as [`CaptureSource::open`] and [`CaptureSource::open_file`].
    pub fn from_source(source: &VideoSource, width: i32, height: i32) -> Result<Self> {
        match source {
            VideoSource::Camera(index) => Self::open(*index, width, height),
            VideoSource::File(path) => Self::open_file(path),
        }
    }

    /// Flip frames horizontally so the preview behaves like a mirror
    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Extra attempts for a failed camera read before giving up
    #[must_use]
    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    #[must_use]
    pub const fn source(&self) -> &VideoSource {
        &self.source
    }

    fn grab(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .map_err(|e| Error::DeviceUnavailable(format!("read failed: {e}")))?;
        if ok && !frame.empty() {
            Ok(Some(frame))
        } else {
            Ok(None)
        }
    }
}

impl FrameSource for CaptureSource {
    fn read_frame(&mut self) -> Result<Mat> {
        let mut attempts = 0;
        let frame = loop {
            match self.grab()? {
                Some(frame) => break frame,
                None if matches!(self.source, VideoSource::File(_)) => {
                    info!("End of video file reached");
                    return Err(Error::DeviceUnavailable(END_OF_STREAM.to_string()));
                }
                None if attempts < self.read_retries => {
                    attempts += 1;
                    warn!("Failed to read frame, retrying ({attempts}/{})", self.read_retries);
                }
                None => return Err(Error::DeviceUnavailable("camera returned no frame".to_string())),
            }
        };

        if !self.reported_size {
            info!("Capturing at {}x{}", frame.cols(), frame.rows());
            self.reported_size = true;
        }

        if self.mirror {
            let mut flipped = Mat::default();
            core::flip(&frame, &mut flipped, 1)?;
            return Ok(flipped);
        }

        Ok(frame)
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release capture: {e}");
        } else {
            debug!("Capture released");
        }
    }
}

/// Replays prepared frames, then reports the device as gone
pub struct FrameQueue {
    frames: std::collections::VecDeque<Result<Mat>>,
}

impl FrameQueue {
    #[must_use]
    pub fn new(frames: Vec<Mat>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
        }
    }

    /// Queue a read failure after the frames queued so far
    #[must_use]
    pub fn then_fail(mut self, reason: &str) -> Self {
        self.frames.push_back(Err(Error::DeviceUnavailable(reason.to_string())));
        self
    }
}

impl FrameSource for FrameQueue {
    fn read_frame(&mut self) -> Result<Mat> {
        self.frames
            .pop_front()
            .unwrap_or_else(|| Err(Error::DeviceUnavailable(END_OF_STREAM.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::CV_8UC3;

    fn blank() -> Mat {
        Mat::zeros(48, 64, CV_8UC3).unwrap().to_mat().unwrap()
    }

    #[test]
    fn test_frame_queue_replays_then_ends() {
        let mut queue = FrameQueue::new(vec![blank(), blank()]);
        assert!(queue.read_frame().is_ok());
        assert!(queue.read_frame().is_ok());
        let err = queue.read_frame().unwrap_err();
        assert!(err.is_end_of_stream());
    }

    #[test]
    fn test_frame_queue_failure() {
        let mut queue = FrameQueue::new(vec![blank()]).then_fail("unplugged");
        assert!(queue.read_frame().is_ok());
        match queue.read_frame() {
            Err(Error::DeviceUnavailable(msg)) => assert_eq!(msg, "unplugged"),
            other => panic!("Expected DeviceUnavailable, got {:?}", other.map(|m| m.rows())),
        }
    }

    #[test]
    fn test_missing_video_file() {
        let result = CaptureSource::open_file("/nonexistent/clip.mp4");
        assert!(matches!(result, Err(Error::DeviceUnavailable(_))));
    }
}
