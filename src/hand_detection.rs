//! Hand landmark detection.
//!
//! Detectors return landmarks plus optional annotation primitives; they never
//! draw on the frame themselves.

use crate::{
    constants::{
        BBOX_PADDING, DEFAULT_MODEL_INPUT_SIZE, LANDMARK_DOT_RADIUS, LANDMARK_OUTPUT_STRIDE, NUM_HAND_LANDMARKS,
    },
    landmarks::{Handedness, Landmark, LandmarkSet, HAND_CONNECTIONS},
    render::{Bgr, Primitive, Stroke},
    utils::{
        pad_box,
        safe_cast::{scale_to_pixel, usize_to_i32},
    },
    Error, Result,
};
use log::{debug, info, trace};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Size, Vec3f, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

/// Landmarks found in one frame, plus what the detector would like drawn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub landmarks: LandmarkSet,
    pub annotations: Vec<Primitive>,
}

impl Detection {
    /// Detection with no hand
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Hand landmark detection capability
pub trait HandDetector {
    /// Detect at most one hand, rejecting detections scored below `min_confidence`
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails. "No hand" is not an error.
    fn detect(&mut self, frame: &Mat, min_confidence: f32) -> Result<Detection>;
}

/// Skeleton lines and landmark dots for a detected hand
///
/// Right hands get green connections with red dots, left hands the reverse.
#[must_use]
pub fn annotate(landmarks: &LandmarkSet) -> Vec<Primitive> {
    if landmarks.is_empty() {
        return Vec::new();
    }

    let (line_color, dot_color) = match landmarks.handedness() {
        Handedness::Right => (Bgr::GREEN, Bgr::RED),
        Handedness::Left => (Bgr::RED, Bgr::GREEN),
        Handedness::Unknown => (Bgr::WHITE, Bgr::RED),
    };

    let points = landmarks.landmarks();
    let mut primitives: Vec<Primitive> = HAND_CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| {
            let (from, to) = (points.get(a)?, points.get(b)?);
            Some(Primitive::Line {
                from: (from.x, from.y),
                to: (to.x, to.y),
                color: line_color,
                thickness: 2,
            })
        })
        .collect();

    primitives.extend(points.iter().map(|lm| Primitive::Circle {
        center: (lm.x, lm.y),
        radius: LANDMARK_DOT_RADIUS,
        color: dot_color,
        stroke: Stroke::Filled,
    }));

    primitives
}

/// Tensor layout expected by the model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// Batch, height, width, channels
    Nhwc,
    /// Batch, channels, height, width
    Nchw,
}

/// 21-point hand landmark model run through `ONNX` Runtime
///
/// Expects a single-hand landmark network with a square RGB input in
/// `[0, 1]` and outputs `[1, 63]` landmarks in input pixels, `[1, 1]` hand
/// presence and optionally `[1, 1]` handedness.
pub struct OnnxHandDetector {
    session: Session,
    input_size: i32,
    layout: InputLayout,
    scores_are_logits: bool,
    draw: bool,
}

impl OnnxHandDetector {
    /// Load a hand landmark model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or fewer than two outputs
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        info!("Initializing OnnxHandDetector with model: {}", model_path.display());

        if !model_path.exists() {
            return Err(Error::ModelError(format!(
                "Hand landmark model not found: {}",
                model_path.display()
            )));
        }

        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Model has no inputs".to_string()))?;

        if session.outputs.len() < 2 {
            return Err(Error::ModelOutputError(format!(
                "Expected landmark and presence outputs, model has {}",
                session.outputs.len()
            )));
        }

        let (layout, input_size) = Self::input_geometry(&input_meta.dimensions);
        info!("Hand model input: {input_size}x{input_size} ({layout:?})");

        Ok(Self {
            session,
            input_size,
            layout,
            scores_are_logits: true,
            draw: false,
        })
    }

    /// Return skeleton annotations with each detection
    #[must_use]
    pub fn with_draw(mut self, draw: bool) -> Self {
        self.draw = draw;
        self
    }

    /// Whether presence and handedness outputs need a sigmoid
    #[must_use]
    pub fn with_logit_scores(mut self, logits: bool) -> Self {
        self.scores_are_logits = logits;
        self
    }

    /// Work out layout and side length from input dimensions
    #[allow(clippy::cast_possible_truncation)]
    fn input_geometry(dimensions: &[Option<u32>]) -> (InputLayout, i32) {
        let dim = |i: usize| dimensions.get(i).copied().flatten();
        match (dim(1), dim(2), dim(3)) {
            (Some(3), Some(h), _) => (InputLayout::Nchw, h as i32),
            (Some(h), _, Some(3)) => (InputLayout::Nhwc, h as i32),
            _ => (InputLayout::Nhwc, DEFAULT_MODEL_INPUT_SIZE),
        }
    }

    /// Resize, convert to RGB and normalize into a single-image batch
    #[allow(clippy::cast_sign_loss)] // Input size is positive
    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    data[(row * size + col) * channels + ch] = pixel[ch];
                }
            }
        }

        let array = Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::ModelDataFormatError(format!("Failed to create array: {e}")))?;

        Ok(match self.layout {
            InputLayout::Nhwc => array,
            InputLayout::Nchw => array.permuted_axes([0, 3, 1, 2]).as_standard_layout().to_owned(),
        })
    }

    /// Run the model, returning every output flattened
    fn forward(&self, input: Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        outputs
            .iter()
            .map(|output| -> Result<Vec<f32>> {
                let tensor = output.try_extract::<f32>()?;
                let values: Vec<f32> = tensor.view().iter().copied().collect();
                Ok(values)
            })
            .collect()
    }

    fn score(&self, raw: f32) -> f32 {
        if self.scores_are_logits {
            1.0 / (1.0 + (-raw).exp())
        } else {
            raw
        }
    }

    /// Convert raw model landmarks into frame pixel positions
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 21 × 3 values are given.
    pub fn decode_landmarks(
        raw: &[f32],
        input_size: i32,
        frame_width: i32,
        frame_height: i32,
    ) -> Result<Vec<Landmark>> {
        let needed = NUM_HAND_LANDMARKS * LANDMARK_OUTPUT_STRIDE;
        if raw.len() < needed {
            return Err(Error::ModelOutputError(format!(
                "Expected {needed} landmark values, got {}",
                raw.len()
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let side = input_size as f32;
        Ok(raw
            .chunks_exact(LANDMARK_OUTPUT_STRIDE)
            .take(NUM_HAND_LANDMARKS)
            .enumerate()
            .map(|(id, xyz)| {
                Landmark::new(
                    id,
                    scale_to_pixel(xyz[0] / side, frame_width),
                    scale_to_pixel(xyz[1] / side, frame_height),
                )
            })
            .collect())
    }
}

impl HandDetector for OnnxHandDetector {
    fn detect(&mut self, frame: &Mat, min_confidence: f32) -> Result<Detection> {
        let input = self.preprocess(frame)?;
        let outputs = self.forward(input)?;

        let presence = outputs
            .get(1)
            .and_then(|o| o.first())
            .map(|&raw| self.score(raw))
            .ok_or_else(|| Error::ModelOutputError("Missing hand presence output".to_string()))?;

        if presence < min_confidence {
            trace!("Hand presence {presence:.3} below {min_confidence:.2}");
            return Ok(Detection::none());
        }

        let raw = outputs
            .first()
            .ok_or_else(|| Error::ModelOutputError("Missing landmark output".to_string()))?;
        let landmarks = Self::decode_landmarks(raw, self.input_size, frame.cols(), frame.rows())?;

        let handedness = match outputs.get(2).and_then(|o| o.first()) {
            Some(&raw) if self.score(raw) > 0.5 => Handedness::Right,
            Some(_) => Handedness::Left,
            None => Handedness::Unknown,
        };

        let mut set = LandmarkSet::new(landmarks)?.with_handedness(handedness);
        if let Some(bbox) = set.bbox() {
            set = set.with_bbox(pad_box(bbox, BBOX_PADDING, frame.cols(), frame.rows()));
        }
        debug!("Hand detected (presence {presence:.3}, {handedness:?})");

        let annotations = if self.draw { annotate(&set) } else { Vec::new() };
        Ok(Detection {
            landmarks: set,
            annotations,
        })
    }
}

/// Replays prepared landmark sets, one per call, then reports no hand
///
/// Each entry carries a confidence; entries below the requested minimum are
/// reported as no hand, as a real detector would.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    script: VecDeque<(LandmarkSet, f32)>,
    draw: bool,
}

impl ScriptedDetector {
    /// Script where every entry is fully confident
    #[must_use]
    pub fn new(sets: Vec<LandmarkSet>) -> Self {
        Self::with_scores(sets.into_iter().map(|set| (set, 1.0)).collect())
    }

    #[must_use]
    pub fn with_scores(script: Vec<(LandmarkSet, f32)>) -> Self {
        Self {
            script: script.into(),
            draw: false,
        }
    }

    #[must_use]
    pub fn with_draw(mut self, draw: bool) -> Self {
        self.draw = draw;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Mat, min_confidence: f32) -> Result<Detection> {
        let Some((landmarks, score)) = self.script.pop_front() else {
            return Ok(Detection::none());
        };
        if landmarks.is_empty() || score < min_confidence {
            return Ok(Detection::none());
        }
        let annotations = if self.draw { annotate(&landmarks) } else { Vec::new() };
        Ok(Detection {
            landmarks,
            annotations,
        })
    }
}
