//! Shared test utilities for the wrf-configurator workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float and coordinate assertions
//! - Configuration document fixtures
//! - Temporary config files and directories
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;

// Re-export commonly used items at the crate root
pub use fixtures::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(4000.0001_f64, 4000.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(12000.5, 12000.0, 0.001);             // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs, such as projected
/// offsets in metres or `(lon, lat)` corners in degrees.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((288000.0, 600000.0), offset, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (x1, y1) = $left;
        let (x2, y2) = $right;
        $crate::assert_approx_eq!(x1, x2, $epsilon);
        $crate::assert_approx_eq!(y1, y2, $epsilon);
    }};
}
