use nalgebra::Point3;

use super::{
    cache::PrimitiveKey, extent::Extent, line_segment::LineSegment, placement::TubePlacement,
    sphere::Sphere, tube::Tube, DEFAULT_RADIAL_SEGMENTS,
};
use crate::error::GeometryResult;

/// Which ends of a capsule are left without a cap sphere.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapsuleEnds {
    #[serde(default)]
    pub open_top: bool,
    #[serde(default)]
    pub open_bottom: bool,
}

impl CapsuleEnds {
    pub const CLOSED: CapsuleEnds = CapsuleEnds {
        open_top: false,
        open_bottom: false,
    };
}

/// An open-ended tube with optional sphere caps at its endpoints.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub segment: LineSegment,
    pub radius: f64,
    pub tube: Tube,
    pub top_cap: Option<Sphere>,
    pub bottom_cap: Option<Sphere>,
}

pub fn compose_capsule(
    top: Point3<f64>,
    bottom: Point3<f64>,
    radius: f64,
    ends: CapsuleEnds,
) -> GeometryResult<Capsule> {
    compose_capsule_with_segments(top, bottom, radius, ends, DEFAULT_RADIAL_SEGMENTS)
}

pub fn compose_capsule_with_segments(
    top: Point3<f64>,
    bottom: Point3<f64>,
    radius: f64,
    ends: CapsuleEnds,
    radial_segments: u32,
) -> GeometryResult<Capsule> {
    let tube = Tube::cylinder(top, bottom, radius)?
        .with_radial_segments(radial_segments)?
        .open_ended(true);
    let cap = |centre, open: bool| {
        (!open).then(|| Sphere::matching_tube(centre, radius, radial_segments))
    };
    Ok(Capsule {
        segment: LineSegment::new(top, bottom),
        radius,
        tube,
        top_cap: cap(top, ends.open_top),
        bottom_cap: cap(bottom, ends.open_bottom),
    })
}

impl Capsule {
    pub fn top(&self) -> Point3<f64> {
        self.segment.top
    }

    pub fn bottom(&self) -> Point3<f64> {
        self.segment.bottom
    }

    pub fn placement(&self) -> &TubePlacement {
        &self.tube.placement
    }

    pub fn ends(&self) -> CapsuleEnds {
        CapsuleEnds {
            open_top: self.top_cap.is_none(),
            open_bottom: self.bottom_cap.is_none(),
        }
    }

    pub fn segment_length(&self) -> f64 {
        self.segment.length()
    }

    /// Length along the axis including whichever caps are present.
    pub fn length(&self) -> f64 {
        self.segment_length() + self.radius * self.caps().count() as f64
    }

    pub fn width(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn caps(&self) -> impl Iterator<Item = &Sphere> {
        self.top_cap.iter().chain(self.bottom_cap.iter())
    }

    pub fn radial_segments(&self) -> u32 {
        self.tube.radial_segments
    }

    pub fn tube_key(&self) -> PrimitiveKey {
        PrimitiveKey::tube(self.radius, self.segment_length(), self.radial_segments())
    }

    pub fn cap_key(&self) -> PrimitiveKey {
        PrimitiveKey::sphere(self.radius, self.radial_segments())
    }

    /// Whether `p` lies inside the closed capsule of this radius around the axis.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (self.segment.closest_point(*p) - p).norm() <= self.radius
    }
}

impl Extent for Capsule {
    fn furthest_point_along_axis(&self, i: usize, positive: bool) -> Point3<f64> {
        std::iter::once(self.tube.furthest_point_along_axis(i, positive))
            .chain(self.caps().map(|c| c.furthest_point_along_axis(i, positive)))
            .reduce(|a, b| if (b[i] > a[i]) == positive { b } else { a })
            .unwrap_or(self.segment.top)
    }
}
