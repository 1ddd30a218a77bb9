//! Hand landmark schema and the per-frame landmark set.
//!
//! The detector reports 21 keypoints per hand using a fixed anatomical
//! numbering: the wrist, then four points per finger from the palm outwards.

use crate::{constants::NUM_HAND_LANDMARKS, Error, Result};

/// Anatomical landmark ids of the 21-point hand model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    /// Position of this landmark in a [`LandmarkSet`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Skeleton edges between landmark ids, palm first
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (0, 5),
    (9, 13),
    (13, 17),
    (5, 9),
    (0, 17),
    (1, 2),
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (7, 8),
    (9, 10),
    (10, 11),
    (11, 12),
    (13, 14),
    (14, 15),
    (15, 16),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// Which hand the detector believes it saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

/// A single keypoint in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    /// Anatomical id, 0-20
    pub id: usize,
    /// Pixel column
    pub x: i32,
    /// Pixel row
    pub y: i32,
}

impl Landmark {
    #[must_use]
    pub const fn new(id: usize, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }
}

/// Axis-aligned box around the landmarks of one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    /// Smallest box containing every landmark. `None` for an empty slice.
    #[must_use]
    pub fn from_landmarks(landmarks: &[Landmark]) -> Option<Self> {
        let first = landmarks.first()?;
        let init = Self {
            xmin: first.x,
            ymin: first.y,
            xmax: first.x,
            ymax: first.y,
        };
        Some(landmarks.iter().skip(1).fold(init, |b, lm| Self {
            xmin: b.xmin.min(lm.x),
            ymin: b.ymin.min(lm.y),
            xmax: b.xmax.max(lm.x),
            ymax: b.ymax.max(lm.y),
        }))
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// `OpenCV` rectangle covering the same area
    #[must_use]
    pub fn to_rect(&self) -> opencv::core::Rect {
        opencv::core::Rect::new(self.xmin, self.ymin, self.width(), self.height())
    }
}

/// Landmarks for at most one detected hand
///
/// Either empty (no hand this frame) or exactly [`NUM_HAND_LANDMARKS`]
/// landmarks with ids 0-20 in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
    bbox: Option<BoundingBox>,
    handedness: Handedness,
}

impl LandmarkSet {
    /// The set reported when no hand is detected
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from landmarks, checking the 21-point schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLandmarks`] if the count is not 21 or the ids
    /// are not 0-20 in order.
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self> {
        if landmarks.is_empty() {
            return Ok(Self::empty());
        }
        if landmarks.len() != NUM_HAND_LANDMARKS {
            return Err(Error::InvalidLandmarks(format!(
                "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
                landmarks.len()
            )));
        }
        if let Some((pos, lm)) = landmarks.iter().enumerate().find(|(pos, lm)| lm.id != *pos) {
            return Err(Error::InvalidLandmarks(format!(
                "landmark at position {pos} has id {}",
                lm.id
            )));
        }
        let bbox = BoundingBox::from_landmarks(&landmarks);
        Ok(Self {
            landmarks,
            bbox,
            handedness: Handedness::Unknown,
        })
    }

    /// Build a set from pixel positions ordered by landmark id
    ///
    /// # Errors
    ///
    /// Same as [`LandmarkSet::new`].
    pub fn from_points(points: &[(i32, i32)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .enumerate()
                .map(|(id, &(x, y))| Landmark::new(id, x, y))
                .collect(),
        )
    }

    #[must_use]
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Replace the bounding box, e.g. after padding it
    #[must_use]
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        if !self.landmarks.is_empty() {
            self.bbox = Some(bbox);
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[must_use]
    pub fn get(&self, landmark: HandLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }

    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    #[must_use]
    pub const fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    #[must_use]
    pub const fn handedness(&self) -> Handedness {
        self.handedness
    }
}
