//! Overlay drawing.
//!
//! Everything drawn on a frame is first described as a list of [`Primitive`]s
//! and then painted with `OpenCV`. The renderer is the only place that
//! touches pixels.

use crate::{
    constants::{
        BAR_BASELINE, BAR_LEFT, BAR_OUTLINE_THICKNESS, BAR_RIGHT, BAR_TOP, CONNECTOR_THICKNESS, FINGERTIP_RADIUS,
        FPS_TEXT_ORIGIN, PERCENT_TEXT_ORIGIN,
    },
    gesture::GestureMetrics,
    mapping::ControlState,
    utils::safe_cast::f64_to_i32_clamp,
    Result,
};
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FILLED, FONT_HERSHEY_COMPLEX, LINE_8},
};

/// Color in blue, green, red order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr(pub u8, pub u8, pub u8);

impl Bgr {
    pub const MAGENTA: Self = Self(255, 0, 255);
    pub const LIGHT_MAGENTA: Self = Self(255, 100, 255);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const BLUE: Self = Self(255, 0, 0);
    pub const RED: Self = Self(0, 0, 255);
    pub const WHITE: Self = Self(255, 255, 255);

    #[must_use]
    pub fn to_scalar(self) -> Scalar {
        Scalar::new(f64::from(self.0), f64::from(self.1), f64::from(self.2), 0.0)
    }
}

/// Fill or outline thickness of a closed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Filled,
    Outline(i32),
}

impl Stroke {
    const fn thickness(self) -> i32 {
        match self {
            Self::Filled => FILLED,
            Self::Outline(t) => t,
        }
    }
}

/// One drawing operation in frame pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: (i32, i32),
        radius: i32,
        color: Bgr,
        stroke: Stroke,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Bgr,
        thickness: i32,
    },
    Rectangle {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Bgr,
        stroke: Stroke,
    },
    Text {
        text: String,
        origin: (i32, i32),
        color: Bgr,
        scale: f64,
        thickness: i32,
    },
}

/// Integer percent label, truncated like the bar height
#[must_use]
pub fn percent_label(percent: f64) -> String {
    format!("{}%", f64_to_i32_clamp(percent, i32::MIN, i32::MAX))
}

/// FPS label; `--` when the rate is unavailable
#[must_use]
pub fn fps_label(fps: Option<f64>) -> String {
    match fps {
        Some(fps) => format!("FPS: {}", f64_to_i32_clamp(fps, i32::MIN, i32::MAX)),
        None => "FPS: --".to_string(),
    }
}

/// Primitives for the pinch markers, the bar and both readouts, in drawing order
#[must_use]
pub fn overlay(metrics: Option<&GestureMetrics>, state: &ControlState, fps: Option<f64>) -> Vec<Primitive> {
    let mut primitives = Vec::with_capacity(8);

    if let Some(m) = metrics {
        primitives.push(Primitive::Circle {
            center: m.thumb_tip(),
            radius: FINGERTIP_RADIUS,
            color: Bgr::MAGENTA,
            stroke: Stroke::Filled,
        });
        primitives.push(Primitive::Circle {
            center: m.index_tip(),
            radius: FINGERTIP_RADIUS,
            color: Bgr::MAGENTA,
            stroke: Stroke::Filled,
        });
        primitives.push(Primitive::Circle {
            center: m.midpoint,
            radius: FINGERTIP_RADIUS,
            color: Bgr::LIGHT_MAGENTA,
            stroke: Stroke::Filled,
        });
        primitives.push(Primitive::Line {
            from: m.thumb_tip(),
            to: m.index_tip(),
            color: Bgr::MAGENTA,
            thickness: CONNECTOR_THICKNESS,
        });
    }

    primitives.push(Primitive::Rectangle {
        top_left: (BAR_LEFT, BAR_TOP),
        bottom_right: (BAR_RIGHT, BAR_BASELINE),
        color: Bgr::GREEN,
        stroke: Stroke::Outline(BAR_OUTLINE_THICKNESS),
    });
    primitives.push(Primitive::Rectangle {
        top_left: (BAR_LEFT, f64_to_i32_clamp(state.bar_height, i32::MIN, i32::MAX)),
        bottom_right: (BAR_RIGHT, BAR_BASELINE),
        color: Bgr::GREEN,
        stroke: Stroke::Filled,
    });
    primitives.push(Primitive::Text {
        text: percent_label(state.percent),
        origin: PERCENT_TEXT_ORIGIN,
        color: Bgr::GREEN,
        scale: 1.0,
        thickness: 2,
    });
    primitives.push(Primitive::Text {
        text: fps_label(fps),
        origin: FPS_TEXT_ORIGIN,
        color: Bgr::BLUE,
        scale: 1.0,
        thickness: 3,
    });

    primitives
}

fn point((x, y): (i32, i32)) -> Point {
    Point::new(x, y)
}

/// Paint one primitive onto the frame
///
/// # Errors
///
/// Returns an error if the `OpenCV` drawing call fails.
pub fn draw(frame: &mut Mat, primitive: &Primitive) -> Result<()> {
    match primitive {
        Primitive::Circle {
            center,
            radius,
            color,
            stroke,
        } => imgproc::circle(
            frame,
            point(*center),
            *radius,
            color.to_scalar(),
            stroke.thickness(),
            LINE_8,
            0,
        )?,
        Primitive::Line {
            from,
            to,
            color,
            thickness,
        } => imgproc::line(frame, point(*from), point(*to), color.to_scalar(), *thickness, LINE_8, 0)?,
        Primitive::Rectangle {
            top_left,
            bottom_right,
            color,
            stroke,
        } => imgproc::rectangle_points(
            frame,
            point(*top_left),
            point(*bottom_right),
            color.to_scalar(),
            stroke.thickness(),
            LINE_8,
            0,
        )?,
        Primitive::Text {
            text,
            origin,
            color,
            scale,
            thickness,
        } => imgproc::put_text(
            frame,
            text,
            point(*origin),
            FONT_HERSHEY_COMPLEX,
            *scale,
            color.to_scalar(),
            *thickness,
            LINE_8,
            false,
        )?,
    }
    Ok(())
}

/// Paints detector annotations followed by the control overlay
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    /// Draw everything for one frame in place
    ///
    /// # Errors
    ///
    /// Returns an error if any `OpenCV` drawing call fails.
    pub fn render(
        &self,
        frame: &mut Mat,
        annotations: &[Primitive],
        metrics: Option<&GestureMetrics>,
        state: &ControlState,
        fps: Option<f64>,
    ) -> Result<()> {
        for primitive in annotations.iter().chain(overlay(metrics, state, fps).iter()) {
            draw(frame, primitive)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::{
        core::{Vec3b, CV_8UC3},
        prelude::*,
    };

    fn metrics() -> GestureMetrics {
        GestureMetrics {
            x1: 300,
            y1: 300,
            x2: 400,
            y2: 300,
            midpoint: (350, 300),
            distance: 100.0,
        }
    }

    #[test]
    fn test_overlay_without_hand() {
        let state = ControlState {
            percent: 42.9,
            bar_height: 292.75,
        };
        let primitives = overlay(None, &state, Some(29.97));
        assert_eq!(primitives.len(), 4);
        assert_eq!(
            primitives[1],
            Primitive::Rectangle {
                top_left: (50, 292),
                bottom_right: (85, 400),
                color: Bgr::GREEN,
                stroke: Stroke::Filled,
            }
        );
        assert!(matches!(&primitives[2], Primitive::Text { text, origin: (50, 450), .. } if text == "42%"));
        assert!(
            matches!(&primitives[3], Primitive::Text { text, origin: (40, 70), color: Bgr::BLUE, .. } if text == "FPS: 29")
        );
    }

    #[test]
    fn test_overlay_with_hand_order() {
        let primitives = overlay(Some(&metrics()), &ControlState::default(), None);
        assert_eq!(primitives.len(), 8);
        assert!(matches!(
            primitives[0],
            Primitive::Circle { center: (300, 300), radius: 15, color: Bgr::MAGENTA, stroke: Stroke::Filled }
        ));
        assert!(matches!(
            primitives[1],
            Primitive::Circle { center: (400, 300), color: Bgr::MAGENTA, .. }
        ));
        assert!(matches!(
            primitives[2],
            Primitive::Circle { center: (350, 300), color: Bgr::LIGHT_MAGENTA, .. }
        ));
        assert!(matches!(
            primitives[3],
            Primitive::Line { from: (300, 300), to: (400, 300), thickness: 3, .. }
        ));
        assert!(matches!(
            primitives[4],
            Primitive::Rectangle { top_left: (50, 150), bottom_right: (85, 400), stroke: Stroke::Outline(3), .. }
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(percent_label(99.99), "99%");
        assert_eq!(percent_label(100.0), "100%");
        assert_eq!(fps_label(Some(5.8e-10)), "FPS: 0");
        assert_eq!(fps_label(None), "FPS: --");
    }

    #[test]
    fn test_render_paints_bar_fill() {
        let mut frame = Mat::zeros(480, 640, CV_8UC3).unwrap().to_mat().unwrap();
        let state = ControlState {
            percent: 100.0,
            bar_height: 150.0,
        };
        Renderer.render(&mut frame, &[], Some(&metrics()), &state, Some(30.0)).unwrap();

        let inside_bar = *frame.at_2d::<Vec3b>(300, 70).unwrap();
        assert_eq!((inside_bar[0], inside_bar[1], inside_bar[2]), (0, 255, 0));

        let thumb = *frame.at_2d::<Vec3b>(300, 300).unwrap();
        assert_eq!((thumb[0], thumb[1], thumb[2]), (255, 0, 255));
    }
}
