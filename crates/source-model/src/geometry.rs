//! Coordinate transforms and hit testing between display and source space.
//!
//! The preview surface renders the composition scaled by a zoom factor.
//! Every conversion floors to whole pixels so repeated partial updates
//! cannot accumulate fractional drift.

use serde::{Deserialize, Serialize};

use livemix_common::error::{LivemixError, LivemixResult};

use crate::source::Source;

/// Scale factor from source space to display space.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Zoom(f64);

impl Zoom {
    /// No scaling.
    pub const IDENTITY: Zoom = Zoom(1.0);

    /// Validate a zoom factor read from the preview surface.
    ///
    /// A surface that has not been laid out yet reports zero; that is a
    /// "not ready" condition, not a usable scale.
    pub fn new(value: f64) -> LivemixResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(LivemixError::StaleZoomFactor { zoom: value })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Zoom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Zoom::new(value).map_err(serde::de::Error::custom)
    }
}

/// A pointer position on the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: i32,
    pub y: i32,
}

impl DisplayPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in display space (the selection box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl DisplayRect {
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, point: DisplayPoint) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x <= self.right()
            && point.y <= self.bottom()
    }
}

/// A rectangle in source space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SourceRect {
    /// Scale into display space, flooring each component independently.
    pub fn to_display(&self, zoom: Zoom) -> DisplayRect {
        let (left, top) = to_display_space(self.x, self.y, zoom);
        let (width, height) = to_display_space(self.width, self.height, zoom);
        DisplayRect {
            left,
            top,
            width,
            height,
        }
    }
}

/// Source-space geometry change applied by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometryDelta {
    pub dx: i32,
    pub dy: i32,
    pub dw: i32,
    pub dh: i32,
}

impl GeometryDelta {
    pub fn is_zero(&self) -> bool {
        *self == GeometryDelta::default()
    }
}

fn floor_div(value: i32, zoom: Zoom) -> i32 {
    (value as f64 / zoom.get()).floor() as i32
}

fn floor_mul(value: i32, zoom: Zoom) -> i32 {
    (value as f64 * zoom.get()).floor() as i32
}

/// Map a display-space point into source space.
pub fn to_source_space(display_x: i32, display_y: i32, zoom: Zoom) -> (i32, i32) {
    (floor_div(display_x, zoom), floor_div(display_y, zoom))
}

/// Map a source-space point into display space.
pub fn to_display_space(source_x: i32, source_y: i32, zoom: Zoom) -> (i32, i32) {
    (floor_mul(source_x, zoom), floor_mul(source_y, zoom))
}

/// Index of the topmost source under `point`, if any.
///
/// Sources are scanned in collection order. A source containing the point
/// replaces the current candidate when its z-order is greater than or equal
/// to the candidate's, so among equal z-orders the later source wins.
pub fn hit_test(point: DisplayPoint, sources: &[Source], zoom: Zoom) -> Option<usize> {
    let mut selected = None;
    let mut top_z = 0;
    for (index, source) in sources.iter().enumerate() {
        if !source.rect().to_display(zoom).contains(point) {
            continue;
        }
        if source.z_order >= top_z {
            selected = Some(index);
            top_z = source.z_order;
        }
    }
    selected
}

/// Source-space delta for a display-space motion of the selection box.
///
/// Each component is divided by `zoom` and floored on its own, so the result
/// depends only on how far the pointer travelled, not on where the box sits.
/// No clamping: a resize may yield zero or negative extents.
pub fn delta_from_display(dx: i32, dy: i32, dw: i32, dh: i32, zoom: Zoom) -> GeometryDelta {
    let (dx, dy) = to_source_space(dx, dy, zoom);
    let (dw, dh) = to_source_space(dw, dh, zoom);
    GeometryDelta { dx, dy, dw, dh }
}

/// Extent of the pointer mask covering an output canvas rendered at `zoom`.
pub fn preview_mask_size(output_width: u32, output_height: u32, zoom: Zoom) -> (i32, i32) {
    to_display_space(output_width as i32, output_height as i32, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourcePayload, SourceType};

    fn source(x: i32, y: i32, w: i32, h: i32, z: i32) -> Source {
        Source {
            source_type: SourceType::ImagePng,
            x,
            y,
            width: w,
            height: h,
            z_order: z,
            alpha: 1.0,
            payload: SourcePayload::Capture,
        }
    }

    fn zoom(v: f64) -> Zoom {
        Zoom::new(v).unwrap()
    }

    #[test]
    fn zoom_rejects_non_positive() {
        assert!(Zoom::new(0.0).is_err());
        assert!(Zoom::new(-1.5).is_err());
        assert!(Zoom::new(f64::NAN).is_err());
        assert!(Zoom::new(f64::INFINITY).is_err());
        assert!(Zoom::new(0.25).is_ok());
    }

    #[test]
    fn zoom_deserialize_validates() {
        assert!(serde_json::from_str::<Zoom>("1.5").is_ok());
        assert!(serde_json::from_str::<Zoom>("0").is_err());
    }

    #[test]
    fn conversions_floor() {
        assert_eq!(to_source_space(151, 149, zoom(1.5)), (100, 99));
        assert_eq!(to_display_space(101, 7, zoom(1.5)), (151, 10));
        assert_eq!(to_source_space(-1, 0, zoom(2.0)), (-1, 0));
    }

    #[test]
    fn display_rect_inclusive_edges() {
        let rect = source(0, 0, 300, 300, 2).rect().to_display(zoom(1.5));
        assert_eq!(
            rect,
            DisplayRect {
                left: 0,
                top: 0,
                width: 450,
                height: 450
            }
        );
        assert!(rect.contains(DisplayPoint::new(450, 450)));
        assert!(rect.contains(DisplayPoint::new(0, 0)));
        assert!(!rect.contains(DisplayPoint::new(451, 10)));
    }

    #[test]
    fn hit_test_prefers_higher_z_regardless_of_order() {
        let a = source(0, 0, 100, 100, 2);
        let b = source(50, 50, 100, 100, 5);
        let p = DisplayPoint::new(75, 75);
        assert_eq!(hit_test(p, &[a.clone(), b.clone()], Zoom::IDENTITY), Some(1));
        assert_eq!(hit_test(p, &[b, a], Zoom::IDENTITY), Some(0));
    }

    #[test]
    fn hit_test_equal_z_last_wins() {
        let a = source(0, 0, 100, 100, 3);
        let b = source(0, 0, 100, 100, 3);
        let c = source(0, 0, 100, 100, 3);
        assert_eq!(
            hit_test(DisplayPoint::new(10, 10), &[a, b, c], Zoom::IDENTITY),
            Some(2)
        );
    }

    #[test]
    fn hit_test_misses() {
        let a = source(0, 0, 100, 100, 2);
        assert_eq!(hit_test(DisplayPoint::new(101, 0), &[a], Zoom::IDENTITY), None);
        assert_eq!(hit_test(DisplayPoint::new(0, 0), &[], Zoom::IDENTITY), None);
    }

    #[test]
    fn hit_test_uses_zoomed_rects() {
        let a = source(0, 0, 300, 300, 2);
        assert_eq!(
            hit_test(DisplayPoint::new(150, 150), std::slice::from_ref(&a), zoom(1.5)),
            Some(0)
        );
        assert_eq!(
            hit_test(DisplayPoint::new(400, 400), std::slice::from_ref(&a), zoom(1.0)),
            None
        );
    }

    #[test]
    fn display_motion_scales_to_source_delta() {
        let d = delta_from_display(300, 300, 0, 0, zoom(1.5));
        assert_eq!(
            d,
            GeometryDelta {
                dx: 200,
                dy: 200,
                dw: 0,
                dh: 0
            }
        );

        let d = delta_from_display(0, 0, -450, 30, zoom(1.5));
        assert_eq!((d.dw, d.dh), (-300, 20));
    }

    #[test]
    fn zero_motion_is_zero_delta_at_any_zoom() {
        for z in [0.75, 1.0, 1.5, 2.25] {
            assert!(delta_from_display(0, 0, 0, 0, zoom(z)).is_zero());
        }
        // A source at x=101 sits at display 151 under 1.5; a one-pixel nudge
        // is below one source unit and must not drift it.
        assert_eq!(delta_from_display(1, 1, 0, 0, zoom(1.5)).dx, 0);
        assert_eq!(delta_from_display(-1, 0, 0, 0, zoom(1.5)).dx, -1);
    }

    #[test]
    fn mask_follows_zoom() {
        assert_eq!(preview_mask_size(1280, 720, zoom(0.5)), (640, 360));
        assert_eq!(preview_mask_size(720, 1280, zoom(0.75)), (540, 960));
    }
}
