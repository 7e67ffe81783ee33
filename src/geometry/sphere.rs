use nalgebra::{Point3, Vector3};

use super::{cache::PrimitiveKey, extent::Extent};

/// A cap sphere, positioned by its centre only.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub centre: Point3<f64>,
    pub radius: f64,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Sphere {
    /// A sphere tessellated to match a tube of `radial_segments`.
    pub fn matching_tube(centre: Point3<f64>, radius: f64, radial_segments: u32) -> Self {
        Sphere {
            centre,
            radius,
            width_segments: radial_segments,
            height_segments: (radial_segments / 2).max(2),
        }
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (p - self.centre).norm() <= self.radius
    }

    pub fn primitive_key(&self) -> PrimitiveKey {
        PrimitiveKey::sphere(self.radius, self.width_segments)
    }
}

impl Extent for Sphere {
    fn furthest_point_along_axis(&self, i: usize, positive: bool) -> Point3<f64> {
        self.centre + Vector3::ith(i, self.radius * if positive { 1.0 } else { -1.0 })
    }
}
