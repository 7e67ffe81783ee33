use nalgebra::{UnitVector3, Vector3};

pub mod cache;
pub mod capsule;
pub mod extent;
pub mod helix;
pub mod line_segment;
pub mod placement;
pub mod sphere;
pub mod tube;

/// Below this cross-product magnitude a direction counts as parallel to the
/// reference axis.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Radial tessellation used when a caller does not ask for one.
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 32;

/// The axis canonical tubes are built along, before placement.
pub fn reference_up() -> UnitVector3<f64> {
    Vector3::y_axis()
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_up() {
        assert_relative_eq!(reference_up().into_inner(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_random_inputs_in_range() {
        let mut rng = testing::rng();
        for _ in 0..200 {
            let p = testing::random_point(&mut rng, 3.0);
            assert!(p.iter().all(|c| (-3.0..3.0).contains(c)));
            assert_relative_eq!(testing::random_direction(&mut rng).norm(), 1.0, epsilon = 1e-12);
        }
    }
}
