use nalgebra::{Point3, UnitVector3, Vector3};

use super::{
    cache::PrimitiveKey,
    extent::Extent,
    placement::{compute_tube_placement, TubePlacement},
    DEFAULT_RADIAL_SEGMENTS,
};
use crate::error::{GeometryError, GeometryResult};

/// A possibly tapered tube spanning two points. With one radius zero it is a
/// cone.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Tube {
    pub placement: TubePlacement,
    pub radius_top: f64,
    pub radius_bottom: f64,
    pub radial_segments: u32,
    pub open_ended: bool,
}

impl Tube {
    pub fn between(
        top: Point3<f64>,
        bottom: Point3<f64>,
        radius_top: f64,
        radius_bottom: f64,
    ) -> GeometryResult<Self> {
        check_radius("radius_top", radius_top)?;
        check_radius("radius_bottom", radius_bottom)?;
        if radius_top == 0.0 && radius_bottom == 0.0 {
            return Err(GeometryError::invalid_parameters(
                "tube needs a non-zero radius at one end at least",
            ));
        }
        Ok(Tube {
            placement: compute_tube_placement(top, bottom)?,
            radius_top,
            radius_bottom,
            radial_segments: DEFAULT_RADIAL_SEGMENTS,
            open_ended: false,
        })
    }

    pub fn cylinder(top: Point3<f64>, bottom: Point3<f64>, radius: f64) -> GeometryResult<Self> {
        Self::between(top, bottom, radius, radius)
    }

    pub fn with_radial_segments(self, radial_segments: u32) -> GeometryResult<Self> {
        if radial_segments == 0 {
            return Err(GeometryError::invalid_parameters(
                "radial_segments must be positive",
            ));
        }
        Ok(Tube {
            radial_segments,
            ..self
        })
    }

    pub fn open_ended(self, open_ended: bool) -> Self {
        Tube { open_ended, ..self }
    }

    pub fn top(&self) -> Point3<f64> {
        self.placement.top()
    }

    pub fn bottom(&self) -> Point3<f64> {
        self.placement.bottom()
    }

    pub fn length(&self) -> f64 {
        self.placement.length
    }

    pub fn is_cylinder(&self) -> bool {
        self.radius_top == self.radius_bottom
    }

    /// Key for sharing tessellated geometry. Only uniform open-ended tubes,
    /// the capsule bodies, share.
    pub fn primitive_key(&self) -> Option<PrimitiveKey> {
        (self.is_cylinder() && self.open_ended)
            .then(|| PrimitiveKey::tube(self.radius_top, self.length(), self.radial_segments))
    }
}

pub(crate) fn check_radius(name: &str, radius: f64) -> GeometryResult<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid_parameters(format!(
            "{name} must be finite and non-negative, got {radius}"
        )))
    }
}

// Extent of a disk of radius `r` centred on `c` with normal `u`, along axis `i`.
pub(crate) fn rim_extent(
    c: Point3<f64>,
    u: &UnitVector3<f64>,
    r: f64,
    i: usize,
    positive: bool,
) -> Point3<f64> {
    let sgn = if positive { 1.0 } else { -1.0 };
    // Direction within the disk plane that moves furthest along e_i.
    let e_i = Vector3::ith(i, 1.0);
    let in_plane = e_i - u.scale(u[i]);
    match UnitVector3::try_new(in_plane, 1e-12) {
        Some(w) => c + w.scale(sgn * r),
        None => c,
    }
}

impl Extent for Tube {
    fn furthest_point_along_axis(&self, i: usize, positive: bool) -> Point3<f64> {
        let u = self.placement.axis();
        let top = rim_extent(self.top(), &u, self.radius_top, i, positive);
        let bottom = rim_extent(self.bottom(), &u, self.radius_bottom, i, positive);
        if (top[i] > bottom[i]) == positive {
            top
        } else {
            bottom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_cone_between_points() {
        let tube = Tube::between(Point3::new(0.0, 300.0, 0.0), Point3::origin(), 50.0, 0.0)
            .unwrap();
        assert!(!tube.is_cylinder());
        assert_eq!(tube.primitive_key(), None);
        assert_relative_eq!(tube.length(), 300.0);
        assert_abs_diff_eq!(tube.top(), Point3::new(0.0, 300.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_radii() {
        let top = Point3::new(1.0, 0.0, 0.0);
        let bottom = Point3::origin();
        assert!(matches!(
            Tube::between(top, bottom, 0.0, 0.0),
            Err(GeometryError::InvalidParameters { .. })
        ));
        assert!(matches!(
            Tube::between(top, bottom, -1.0, 1.0),
            Err(GeometryError::InvalidParameters { .. })
        ));
        assert!(matches!(
            Tube::cylinder(top, bottom, f64::INFINITY),
            Err(GeometryError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_coincident_endpoints() {
        let p = Point3::new(2.0, 2.0, 2.0);
        assert_eq!(
            Tube::cylinder(p, p, 1.0),
            Err(GeometryError::InvalidGeometry { top: p, bottom: p })
        );
    }

    #[test]
    fn test_radial_segments() {
        let tube = Tube::cylinder(Point3::new(0.0, 1.0, 0.0), Point3::origin(), 1.0).unwrap();
        assert_eq!(tube.radial_segments, DEFAULT_RADIAL_SEGMENTS);
        assert_eq!(tube.with_radial_segments(8).unwrap().radial_segments, 8);
        assert!(tube.with_radial_segments(0).is_err());
    }

    #[test]
    fn test_only_open_cylinders_share() {
        let tube = Tube::cylinder(Point3::new(0.0, 4.0, 0.0), Point3::origin(), 1.0).unwrap();
        assert_eq!(tube.primitive_key(), None);
        assert_eq!(
            tube.open_ended(true).primitive_key(),
            Some(PrimitiveKey::tube(1.0, 4.0, DEFAULT_RADIAL_SEGMENTS))
        );
    }

    #[test]
    fn test_cylinder_extent() {
        // Vertical cylinder: rims are horizontal disks.
        let tube = Tube::cylinder(Point3::new(0.0, 10.0, 0.0), Point3::origin(), 2.0).unwrap();
        let (min, max) = tube.bounds();
        assert_abs_diff_eq!(min, Point3::new(-2.0, 0.0, -2.0), epsilon = 1e-9);
        assert_abs_diff_eq!(max, Point3::new(2.0, 10.0, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn test_diagonal_cylinder_extent() {
        let tube = Tube::cylinder(Point3::new(10.0, 10.0, 0.0), Point3::origin(), 1.0).unwrap();
        let (_, max) = tube.bounds();
        // Rim normal is (1,1,0)/sqrt2, so the rim reaches 1/sqrt2 further in x.
        assert_relative_eq!(max.x, 10.0 + 0.5_f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(max.z, 1.0, epsilon = 1e-9);
    }
}
