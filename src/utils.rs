//! Utility functions for coordinate handling.

pub mod safe_cast;

use crate::landmarks::BoundingBox;

/// Grow a bounding box by `padding` pixels on every side, clipped to the frame
///
/// A negative padding shrinks the box; it never collapses past zero size.
#[must_use]
pub fn pad_box(bbox: BoundingBox, padding: i32, max_width: i32, max_height: i32) -> BoundingBox {
    let max_x = max_width.max(0);
    let max_y = max_height.max(0);

    let mut padded = BoundingBox {
        xmin: bbox.xmin.saturating_sub(padding).clamp(0, max_x),
        ymin: bbox.ymin.saturating_sub(padding).clamp(0, max_y),
        xmax: bbox.xmax.saturating_add(padding).clamp(0, max_x),
        ymax: bbox.ymax.saturating_add(padding).clamp(0, max_y),
    };

    if padded.xmax < padded.xmin {
        let center = padded.xmin.midpoint_floor(padded.xmax);
        padded.xmin = center;
        padded.xmax = center;
    }
    if padded.ymax < padded.ymin {
        let center = padded.ymin.midpoint_floor(padded.ymax);
        padded.ymin = center;
        padded.ymax = center;
    }

    padded
}

/// Floor of the mean of two integers, matching integer floor division
pub trait MidpointFloor {
    #[must_use]
    fn midpoint_floor(self, other: Self) -> Self;
}

impl MidpointFloor for i32 {
    fn midpoint_floor(self, other: Self) -> Self {
        let sum = i64::from(self) + i64::from(other);
        // Halving an i64 sum of two i32 values always fits back into i32
        #[allow(clippy::cast_possible_truncation)]
        {
            sum.div_euclid(2) as i32
        }
    }
}
