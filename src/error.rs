use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GeometryError {
    /// The two endpoints of a tube do not define a direction.
    #[display("invalid geometry: endpoints {top} and {bottom} do not define an axis")]
    InvalidGeometry {
        top: Point3<f64>,
        bottom: Point3<f64>,
    },
    #[display("invalid parameters: {reason}")]
    InvalidParameters { reason: String },
}

impl GeometryError {
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        GeometryError::InvalidParameters {
            reason: reason.into(),
        }
    }
}

pub type GeometryResult<T> = Result<T, GeometryError>;
