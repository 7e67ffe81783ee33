use nalgebra::Point3;

/// Axis-aligned reach of a placed shape.
pub trait Extent {
    // Along axis `i`, the point of the shape furthest in the +/- direction.
    fn furthest_point_along_axis(&self, i: usize, positive: bool) -> Point3<f64>;

    fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let min = Point3::new(
            self.furthest_point_along_axis(0, false).x,
            self.furthest_point_along_axis(1, false).y,
            self.furthest_point_along_axis(2, false).z,
        );
        let max = Point3::new(
            self.furthest_point_along_axis(0, true).x,
            self.furthest_point_along_axis(1, true).y,
            self.furthest_point_along_axis(2, true).z,
        );
        (min, max)
    }
}

pub fn merge_bounds<I>(bounds: I) -> Option<(Point3<f64>, Point3<f64>)>
where
    I: IntoIterator<Item = (Point3<f64>, Point3<f64>)>,
{
    bounds.into_iter().reduce(|(min_a, max_a), (min_b, max_b)| {
        (min_a.inf(&min_b), max_a.sup(&max_b))
    })
}
