use nalgebra::{Point3, UnitVector3, Vector3};

use super::extent::Extent;
use crate::error::{GeometryError, GeometryResult};

/// The medial axis of a tube, running from `bottom` to `top`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub top: Point3<f64>,
    pub bottom: Point3<f64>,
}

impl LineSegment {
    pub fn new(top: Point3<f64>, bottom: Point3<f64>) -> Self {
        LineSegment { top, bottom }
    }

    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.top, &self.bottom)
    }

    pub fn bottom_top(&self) -> Vector3<f64> {
        self.top - self.bottom
    }

    pub fn length(&self) -> f64 {
        self.bottom_top().norm()
    }

    /// Unit direction from `bottom` to `top`. Fails when the endpoints coincide.
    pub fn direction(&self) -> GeometryResult<UnitVector3<f64>> {
        let d = self.bottom_top();
        if !d.iter().all(|c| c.is_finite()) {
            return Err(self.degenerate());
        }
        UnitVector3::try_new(d, f64::EPSILON).ok_or_else(|| self.degenerate())
    }

    pub fn reversed(&self) -> Self {
        LineSegment {
            top: self.bottom,
            bottom: self.top,
        }
    }

    pub fn closest_point(&self, p: Point3<f64>) -> Point3<f64> {
        let Ok(u) = self.direction() else {
            return self.bottom;
        };
        let t = u.dot(&(p - self.bottom));
        if t < 0.0 {
            self.bottom
        } else if t > self.length() {
            self.top
        } else {
            self.bottom + u.scale(t)
        }
    }

    fn degenerate(&self) -> GeometryError {
        GeometryError::InvalidGeometry {
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl Extent for LineSegment {
    fn furthest_point_along_axis(&self, i: usize, positive: bool) -> Point3<f64> {
        if (self.top[i] > self.bottom[i]) == positive {
            self.top
        } else {
            self.bottom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoint_and_length() {
        let seg = LineSegment::new(Point3::new(2.0, 4.0, 6.0), Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(seg.midpoint(), Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(seg.length(), 56.0_f64.sqrt());
    }

    #[test]
    fn test_direction_points_bottom_to_top() {
        let seg = LineSegment::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(seg.direction().unwrap().into_inner(), Vector3::z());
        assert_relative_eq!(
            seg.reversed().direction().unwrap().into_inner(),
            -Vector3::z()
        );
    }

    #[test]
    fn test_direction_coincident() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let seg = LineSegment::new(p, p);
        assert_eq!(
            seg.direction(),
            Err(GeometryError::InvalidGeometry { top: p, bottom: p })
        );
    }

    #[test]
    fn test_direction_non_finite() {
        let seg = LineSegment::new(Point3::new(f64::NAN, 0.0, 0.0), Point3::origin());
        assert!(matches!(
            seg.direction(),
            Err(GeometryError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_closest_point() {
        let seg = LineSegment::new(Point3::new(0.0, 10.0, 0.0), Point3::origin());
        assert_relative_eq!(
            seg.closest_point(Point3::new(3.0, 4.0, 0.0)),
            Point3::new(0.0, 4.0, 0.0)
        );
        assert_relative_eq!(seg.closest_point(Point3::new(0.0, -3.0, 1.0)), seg.bottom);
        assert_relative_eq!(seg.closest_point(Point3::new(1.0, 13.0, 0.0)), seg.top);
    }

    #[test]
    fn test_furthest_point_along_axis() {
        let seg = LineSegment::new(Point3::new(-1.0, 5.0, 0.0), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(seg.furthest_point_along_axis(0, true), seg.bottom);
        assert_eq!(seg.furthest_point_along_axis(0, false), seg.top);
        assert_eq!(seg.furthest_point_along_axis(1, true), seg.top);
        assert_eq!(seg.furthest_point_along_axis(1, false), seg.bottom);
    }
}
