//! Pinch geometry between the thumb tip and the index fingertip.

use crate::{
    landmarks::{HandLandmark, LandmarkSet},
    utils::MidpointFloor,
};

/// Geometry of the thumb/index pinch for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMetrics {
    /// Thumb tip column
    pub x1: i32,
    /// Thumb tip row
    pub y1: i32,
    /// Index fingertip column
    pub x2: i32,
    /// Index fingertip row
    pub y2: i32,
    /// Floor midpoint between the two tips
    pub midpoint: (i32, i32),
    /// Euclidean distance between the two tips, in pixels
    pub distance: f64,
}

impl GestureMetrics {
    #[must_use]
    pub const fn thumb_tip(&self) -> (i32, i32) {
        (self.x1, self.y1)
    }

    #[must_use]
    pub const fn index_tip(&self) -> (i32, i32) {
        (self.x2, self.y2)
    }
}

/// Compute the pinch metrics, or `None` when no hand was detected
#[must_use]
pub fn extract(landmarks: &LandmarkSet) -> Option<GestureMetrics> {
    let thumb = landmarks.get(HandLandmark::ThumbTip)?;
    let index = landmarks.get(HandLandmark::IndexTip)?;

    let (x1, y1) = (thumb.x, thumb.y);
    let (x2, y2) = (index.x, index.y);

    let dx = f64::from(x2) - f64::from(x1);
    let dy = f64::from(y2) - f64::from(y1);

    Some(GestureMetrics {
        x1,
        y1,
        x2,
        y2,
        midpoint: (x1.midpoint_floor(x2), y1.midpoint_floor(y2)),
        distance: (dx * dx + dy * dy).sqrt(),
    })
}
