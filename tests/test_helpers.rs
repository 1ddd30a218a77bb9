//! Helper functions and utilities for tests

#![allow(dead_code)]

use hand_volume_control::{
    landmarks::{HandLandmark, LandmarkSet},
    Result,
};
use opencv::{
    core::{Mat, CV_8UC3},
    prelude::*,
};

/// Create a test image with specified dimensions and type
pub fn create_test_image(height: i32, width: i32, cv_type: i32) -> Result<Mat> {
    Mat::zeros(height, width, cv_type)?.to_mat().map_err(Into::into)
}

/// Blank 640x480 BGR frames
pub fn blank_frames(count: usize) -> Result<Vec<Mat>> {
    (0..count).map(|_| create_test_image(480, 640, CV_8UC3)).collect()
}

/// A full hand with the thumb and index tips at the given pixels
///
/// The remaining landmarks sit on a diagonal so the set looks plausible.
pub fn hand_with_tips(thumb: (i32, i32), index: (i32, i32)) -> Result<LandmarkSet> {
    let mut points: Vec<(i32, i32)> = (0..21).map(|i| (300 + i * 4, 300 + i * 2)).collect();
    points[HandLandmark::ThumbTip.index()] = thumb;
    points[HandLandmark::IndexTip.index()] = index;
    LandmarkSet::from_points(&points)
}

/// A hand whose tips are `distance` pixels apart horizontally
pub fn hand_with_distance(distance: i32) -> Result<LandmarkSet> {
    hand_with_tips((200, 240), (200 + distance, 240))
}
