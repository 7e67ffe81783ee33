use std::collections::HashSet;

use log::debug;
use nalgebra::Point3;

use super::{
    cache::PrimitiveKey,
    capsule::{compose_capsule_with_segments, Capsule, CapsuleEnds},
    extent::{merge_bounds, Extent},
    tube::check_radius,
};
use crate::error::{GeometryError, GeometryResult};

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HelixParams {
    // Radius of the sweep around the y axis.
    pub radius: f64,
    pub tube_radius: f64,
    // Samples per full turn, also the tessellation of each capsule.
    pub radial_segments: u32,
    pub turns: f64,
    // Axial extent, centred on y = 0.
    pub height: f64,
    #[serde(default = "default_clockwise")]
    pub clockwise: bool,
}

/// Largest chain `build_helix` will produce.
pub const MAX_SAMPLES: usize = 1_000_000;

fn default_clockwise() -> bool {
    true
}

impl Default for HelixParams {
    fn default() -> Self {
        HelixParams {
            radius: 60.0,
            tube_radius: 5.0,
            radial_segments: 24,
            turns: 1.0,
            height: 300.0,
            clockwise: true,
        }
    }
}

impl HelixParams {
    pub fn validate(&self) -> GeometryResult<()> {
        for (name, r) in [("radius", self.radius), ("tube_radius", self.tube_radius)] {
            check_radius(name, r)?;
            if r == 0.0 {
                return Err(GeometryError::invalid_parameters(format!(
                    "{name} must be positive"
                )));
            }
        }
        if self.radial_segments == 0 {
            return Err(GeometryError::invalid_parameters(
                "radial_segments must be positive",
            ));
        }
        if !(self.turns.is_finite() && self.turns > 0.0) {
            return Err(GeometryError::invalid_parameters(format!(
                "turns must be finite and positive, got {}",
                self.turns
            )));
        }
        if !self.height.is_finite() {
            return Err(GeometryError::invalid_parameters(format!(
                "height must be finite, got {}",
                self.height
            )));
        }
        if self.n_samples() < 1 {
            return Err(GeometryError::invalid_parameters(
                "turns and radial_segments give no samples",
            ));
        }
        if self.n_samples() > MAX_SAMPLES {
            return Err(GeometryError::invalid_parameters(format!(
                "{} turns of {} segments exceeds {} samples",
                self.turns, self.radial_segments, MAX_SAMPLES
            )));
        }
        Ok(())
    }

    /// Number of chain segments, `ceil(turns * radial_segments)`.
    pub fn n_samples(&self) -> usize {
        let n = (self.turns * self.radial_segments as f64).ceil();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    fn sweep_sign(&self) -> f64 {
        if self.clockwise {
            1.0
        } else {
            -1.0
        }
    }

    /// Sample `n` of the curve, for `n` in `0..=n_samples()`.
    pub fn point(&self, n: usize) -> Point3<f64> {
        let n_samples = self.n_samples() as f64;
        let theta = n as f64 * std::f64::consts::TAU / self.radial_segments as f64;
        let y = self.height * (n as f64 / n_samples) - self.height / 2.0;
        Point3::new(
            self.radius * theta.cos(),
            y,
            self.sweep_sign() * self.radius * theta.sin(),
        )
    }

    pub fn points(&self) -> Vec<Point3<f64>> {
        (0..=self.n_samples()).map(|n| self.point(n)).collect()
    }

    pub fn with_turns(self, turns: f64) -> Self {
        HelixParams { turns, ..self }
    }

    pub fn with_clockwise(self, clockwise: bool) -> Self {
        HelixParams { clockwise, ..self }
    }
}

/// Capsules joining consecutive helix samples, bottom to top.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct HelixChain {
    pub params: HelixParams,
    pub capsules: Vec<Capsule>,
}

pub fn build_helix(params: &HelixParams) -> GeometryResult<HelixChain> {
    params.validate()?;
    let n_samples = params.n_samples();
    debug!("Building helix with {} samples: {:?}", n_samples, params);

    let capsules = (1..=n_samples)
        .map(|i| {
            let j = i - 1;
            compose_capsule_with_segments(
                params.point(i),
                params.point(j),
                params.tube_radius,
                CapsuleEnds::CLOSED,
                params.radial_segments,
            )
        })
        .collect::<GeometryResult<Vec<_>>>()?;

    Ok(HelixChain {
        params: *params,
        capsules,
    })
}

impl HelixChain {
    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capsule> {
        self.capsules.iter()
    }

    /// Every tessellated primitive the chain needs, in first-use order.
    pub fn primitive_keys(&self) -> Vec<PrimitiveKey> {
        let mut seen = HashSet::new();
        self.capsules
            .iter()
            .flat_map(|c| [c.tube_key(), c.cap_key()])
            .filter(|k| seen.insert(*k))
            .collect()
    }

    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        merge_bounds(self.capsules.iter().map(|c| c.bounds()))
    }
}

impl<'a> IntoIterator for &'a HelixChain {
    type Item = &'a Capsule;
    type IntoIter = std::slice::Iter<'a, Capsule>;

    fn into_iter(self) -> Self::IntoIter {
        self.capsules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_one_turn_is_connected() {
        let chain = build_helix(&HelixParams::default()).unwrap();
        assert_eq!(chain.len(), 24);
        for pair in chain.capsules.windows(2) {
            assert_abs_diff_eq!(pair[1].bottom(), pair[0].top(), epsilon = 1e-9);
            assert_abs_diff_eq!(
                pair[1].placement().bottom(),
                pair[0].placement().top(),
                epsilon = 1e-9
            );
        }
        assert!(chain.iter().all(|c| c.caps().count() == 2));
        assert!(chain.iter().all(|c| c.radius == 5.0));
    }

    #[test]
    fn test_endpoints_span_height() {
        let chain = build_helix(&HelixParams::default()).unwrap();
        let first = chain.capsules.first().unwrap();
        let last = chain.capsules.last().unwrap();
        assert_abs_diff_eq!(first.bottom(), Point3::new(60.0, -150.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(last.top(), Point3::new(60.0, 150.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_samples_lie_on_cylinder() {
        let params = HelixParams::default();
        for p in params.points() {
            assert_relative_eq!((p.x * p.x + p.z * p.z).sqrt(), 60.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_chirality_flips_z() {
        let cw = HelixParams::default();
        let ccw = cw.with_clockwise(false);
        for (a, b) in cw.points().iter().zip(ccw.points().iter()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_eq!(a.z, -b.z);
        }
        // Clockwise sweeps towards +z first.
        assert!(cw.point(1).z > 0.0);
    }

    #[test]
    fn test_fractional_turns() {
        let params = HelixParams::default().with_turns(0.5);
        assert_eq!(params.n_samples(), 12);
        let chain = build_helix(&params).unwrap();
        assert_eq!(chain.len(), 12);
        // Half a turn ends on the opposite side of the axis.
        assert_abs_diff_eq!(
            chain.capsules[11].top(),
            Point3::new(-60.0, 150.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_partial_sample_rounds_up() {
        let params = HelixParams {
            radial_segments: 10,
            turns: 0.25,
            ..HelixParams::default()
        };
        assert_eq!(params.n_samples(), 3);
        assert_eq!(build_helix(&params).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_parameters() {
        let base = HelixParams::default();
        let cases = [
            base.with_turns(0.0),
            base.with_turns(-1.0),
            base.with_turns(f64::NAN),
            HelixParams {
                radial_segments: 0,
                ..base
            },
            HelixParams {
                radius: 0.0,
                ..base
            },
            HelixParams {
                tube_radius: -5.0,
                ..base
            },
            HelixParams {
                height: f64::INFINITY,
                ..base
            },
        ];
        for params in cases {
            assert!(
                matches!(
                    build_helix(&params),
                    Err(GeometryError::InvalidParameters { .. })
                ),
                "params={:?}",
                params
            );
        }
    }

    #[test]
    fn test_sample_count_is_capped() {
        let huge = HelixParams::default().with_turns(1e12);
        assert!(matches!(
            build_helix(&huge),
            Err(GeometryError::InvalidParameters { .. })
        ));
        let at_cap = HelixParams {
            radial_segments: 1000,
            ..HelixParams::default()
        }
        .with_turns(1000.0);
        assert_eq!(at_cap.n_samples(), MAX_SAMPLES);
        assert!(at_cap.validate().is_ok());
        assert!(at_cap.with_turns(1000.001).validate().is_err());
    }

    #[test]
    fn test_primitives_are_shared() {
        let chain = build_helix(&HelixParams::default()).unwrap();
        let keys = chain.primitive_keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], chain.capsules[0].tube_key());
        assert_eq!(keys[1], chain.capsules[0].cap_key());
    }

    #[test]
    fn test_idempotent() {
        let params = HelixParams::default().with_turns(2.5);
        assert_eq!(build_helix(&params).unwrap(), build_helix(&params).unwrap());
    }

    #[test]
    fn test_bounds() {
        let chain = build_helix(&HelixParams::default()).unwrap();
        let (min, max) = chain.bounds().unwrap();
        assert_relative_eq!(max.y, 155.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, -155.0, epsilon = 1e-9);
        assert!(max.x <= 65.0 + 1e-9);
    }

    #[test]
    fn test_yaml_defaults_clockwise() {
        let params: HelixParams = serde_yaml::from_str(
            "radius: 1.0\ntube_radius: 0.1\nradial_segments: 8\nturns: 2\nheight: 4.0\n",
        )
        .unwrap();
        assert!(params.clockwise);
        assert_eq!(params.n_samples(), 16);
    }
}
