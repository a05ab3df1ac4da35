//! Coordinate reference system transformations.
//!
//! Implements the map projections needed to report WRF domain extents,
//! from scratch and without external dependencies.

pub mod error;
pub mod lambert;

pub use error::{ProjectionError, Result};
pub use lambert::{LambertConformal, EARTH_RADIUS};
