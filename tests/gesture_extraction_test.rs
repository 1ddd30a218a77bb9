//! Pinch extraction and overlay tests on real frames

mod test_helpers;

use hand_volume_control::{
    gesture::extract,
    hand_detection::{annotate, HandDetector, ScriptedDetector},
    landmarks::{Handedness, LandmarkSet},
    mapping::ControlMapper,
    render::{Primitive, Renderer},
};
use opencv::{
    core::{Vec3b, CV_8UC3},
    prelude::*,
};
use test_helpers::{create_test_image, hand_with_tips};

#[test]
fn test_vertical_pinch() {
    let hand = hand_with_tips((100, 100), (100, 150)).unwrap();
    let metrics = extract(&hand).unwrap();

    assert_eq!(metrics.thumb_tip(), (100, 100));
    assert_eq!(metrics.index_tip(), (100, 150));
    assert_eq!(metrics.distance, 50.0);
    assert_eq!(metrics.midpoint, (100, 125));
}

#[test]
fn test_diagonal_pinch() {
    let hand = hand_with_tips((0, 0), (30, 40)).unwrap();
    let metrics = extract(&hand).unwrap();
    assert_eq!(metrics.distance, 50.0);
    assert_eq!(metrics.midpoint, (15, 20));
}

#[test]
fn test_odd_sum_midpoint_floors() {
    let hand = hand_with_tips((101, 100), (100, 151)).unwrap();
    assert_eq!(extract(&hand).unwrap().midpoint, (100, 125));
}

#[test]
fn test_extraction_is_idempotent() {
    let hand = hand_with_tips((320, 200), (410, 260)).unwrap();
    assert_eq!(extract(&hand), extract(&hand));
}

#[test]
fn test_empty_set_has_no_metrics() {
    assert!(extract(&LandmarkSet::empty()).is_none());
}

#[test]
fn test_detect_then_render() {
    let mut frame = create_test_image(480, 640, CV_8UC3).unwrap();
    let hand = hand_with_tips((200, 240), (360, 240))
        .unwrap()
        .with_handedness(Handedness::Right);

    let mut detector = ScriptedDetector::new(vec![hand]).with_draw(true);
    let detection = detector.detect(&frame, 0.75).unwrap();
    assert!(!detection.annotations.is_empty());
    assert_eq!(detection.annotations, annotate(&detection.landmarks));

    let metrics = extract(&detection.landmarks).unwrap();
    let state = ControlMapper::default().map(metrics.distance);
    assert!((state.percent - 50.0).abs() < 1e-9);

    Renderer
        .render(&mut frame, &detection.annotations, Some(&metrics), &state, Some(30.0))
        .unwrap();

    // Midpoint marker is light magenta below the connector line
    let mid = *frame.at_2d::<Vec3b>(252, 280).unwrap();
    assert_eq!((mid[0], mid[1], mid[2]), (255, 100, 255));

    // Bar filled from row 275 down to the baseline
    let filled = *frame.at_2d::<Vec3b>(350, 67).unwrap();
    assert_eq!((filled[0], filled[1], filled[2]), (0, 255, 0));
    let empty = *frame.at_2d::<Vec3b>(200, 67).unwrap();
    assert_eq!((empty[0], empty[1], empty[2]), (0, 0, 0));
}

#[test]
fn test_annotations_cover_skeleton() {
    let hand = hand_with_tips((10, 10), (20, 20)).unwrap();
    let annotations = annotate(&hand);
    let lines = annotations.iter().filter(|p| matches!(p, Primitive::Line { .. })).count();
    let dots = annotations.iter().filter(|p| matches!(p, Primitive::Circle { .. })).count();
    assert_eq!(lines, 21);
    assert_eq!(dots, 21);
}
