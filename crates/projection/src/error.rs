//! Projection errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("Invalid projection parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Degenerate cone: true latitudes {0} and {1} give a zero cone constant")]
    DegenerateCone(f64, f64),
}
