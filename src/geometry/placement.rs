use log::debug;
use nalgebra::{
    Isometry3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, UnitVector3, Vector3,
};

use super::{line_segment::LineSegment, reference_up, PARALLEL_EPSILON};
use crate::error::GeometryResult;

/// Where a canonical tube goes so that it spans a segment.
///
/// The canonical tube is centred on the origin with its axis along
/// [`reference_up`] and its length equal to `length`. Placing it means
/// translating by `translation` and rotating by (`rotation_axis`,
/// `rotation_angle`), composed as `T * R`, so the rotation acts first on the
/// canonical points.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TubePlacement {
    pub translation: Vector3<f64>,
    pub rotation_axis: UnitVector3<f64>,
    pub rotation_angle: f64,
    pub length: f64,
}

/// Align the reference axis with the direction from `bottom` to `top`.
pub fn compute_tube_placement(
    top: Point3<f64>,
    bottom: Point3<f64>,
) -> GeometryResult<TubePlacement> {
    let segment = LineSegment::new(top, bottom);
    let axis = segment.direction()?;
    let up = reference_up().into_inner();

    // When axis is parallel or anti-parallel to up the cross product vanishes.
    // Any axis perpendicular to up then works for an angle of 0 or pi.
    let cross = axis.cross(&up);
    let rotation_axis = if cross.norm() < PARALLEL_EPSILON {
        debug!("Tube axis {:?} is parallel to up, rotating about x", axis);
        Vector3::x_axis()
    } else {
        UnitVector3::new_normalize(cross)
    };

    // Rotation about cross(axis, up) runs opposite to the one carrying up onto
    // axis, hence the negation.
    let rotation_angle = -axis.dot(&up).clamp(-1.0, 1.0).acos();

    Ok(TubePlacement {
        translation: segment.midpoint().coords,
        rotation_axis,
        rotation_angle,
        length: segment.length(),
    })
}

impl TubePlacement {
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&self.rotation_axis, self.rotation_angle)
    }

    pub fn unit_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.rotation_axis, self.rotation_angle)
    }

    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.unit_quaternion())
    }

    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        self.isometry().to_homogeneous()
    }

    /// Map a point given in the canonical tube frame into world space.
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.isometry().transform_point(p)
    }

    /// Direction of the placed tube axis, from bottom to top.
    pub fn axis(&self) -> UnitVector3<f64> {
        UnitVector3::new_unchecked(self.rotation() * reference_up().into_inner())
    }

    pub fn top(&self) -> Point3<f64> {
        self.transform_point(&Point3::from(reference_up().scale(0.5 * self.length)))
    }

    pub fn bottom(&self) -> Point3<f64> {
        self.transform_point(&Point3::from(reference_up().scale(-0.5 * self.length)))
    }

    /// Per-axis scale for a renderer that places radius-1, length-1 primitives.
    pub fn scale(&self, radius: f64) -> Vector3<f64> {
        Vector3::new(radius, self.length, radius)
    }
}
