//! Pixel-space point math shared by every chart engine.

use serde::{Deserialize, Serialize};

/// A point in pixel space, optionally carrying the text drawn at it.
///
/// Radar vertices and line chart samples both travel as `Coordinate` so the
/// value label stays attached to the geometry that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Moves the point `delta` pixels further away from `center`.
    ///
    /// A negative `delta` pulls the point towards `center`. The point is
    /// returned unchanged when it coincides with `center`, since the
    /// direction is undefined there.
    #[must_use]
    pub fn stretch(&self, center: &Coordinate, delta: f64) -> Coordinate {
        let length = self.distance(center);
        if length == 0.0 || !length.is_finite() {
            return self.clone();
        }
        let scale = (length + delta) / length;
        Coordinate {
            x: center.x + (self.x - center.x) * scale,
            y: center.y + (self.y - center.y) * scale,
            label: self.label.clone(),
        }
    }

    /// Point reflection through `center`.
    #[must_use]
    pub fn inverse(&self, center: &Coordinate) -> Coordinate {
        Coordinate {
            x: 2.0 * center.x - self.x,
            y: 2.0 * center.y - self.y,
            label: self.label.clone(),
        }
    }

    /// Nearest point to `target` on a `width x height` rectangle centered at
    /// `self`.
    ///
    /// Returns `target` itself when it lies inside the rectangle.
    #[must_use]
    pub fn closest_point_on_rect(&self, target: &Coordinate, width: f64, height: f64) -> Coordinate {
        let rect = PixelRect::centered(self.x, self.y, width, height);
        rect.clamp(target)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    #[must_use]
    pub fn centered(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        let half_w = width.abs() * 0.5;
        let half_h = height.abs() * 0.5;
        Self {
            left: center_x - half_w,
            top: center_y - half_h,
            right: center_x + half_w,
            bottom: center_y + half_h,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn contains(self, point: &Coordinate) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    #[must_use]
    pub fn clamp(self, point: &Coordinate) -> Coordinate {
        Coordinate::new(
            point.x.clamp(self.left, self.right),
            point.y.clamp(self.top, self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, PixelRect};

    #[test]
    fn stretch_keeps_direction_from_center() {
        let center = Coordinate::new(0.0, 0.0);
        let point = Coordinate::new(3.0, 4.0).with_label("math");

        let stretched = point.stretch(&center, 5.0);
        assert!((stretched.x - 6.0).abs() <= 1e-9);
        assert!((stretched.y - 8.0).abs() <= 1e-9);
        assert_eq!(stretched.label.as_deref(), Some("math"));
    }

    #[test]
    fn stretch_at_center_is_identity() {
        let center = Coordinate::new(10.0, 10.0);
        assert_eq!(center.stretch(&center, 4.0), center);
    }

    #[test]
    fn rect_clamp_returns_inside_points_unchanged() {
        let rect = PixelRect::centered(0.0, 0.0, 10.0, 4.0);
        let inside = Coordinate::new(1.0, 1.0);
        assert!(rect.contains(&inside));
        assert_eq!(rect.clamp(&inside), inside);
        assert_eq!(rect.clamp(&Coordinate::new(20.0, -9.0)), Coordinate::new(5.0, -2.0));
    }
}
