//! Lambert Conformal Conic projection.
//!
//! This is the projection WRF calls `lambert`. It maps a cone tangent or
//! secant to a spherical Earth onto a flat plane.
//!
//! The projection parameters are the ones found in a WPS `geogrid`
//! namelist:
//! - True latitudes: `truelat1` and `truelat2` (equal for a tangent cone)
//! - Standard longitude (`stand_lon`): the meridian parallel to the y axis
//! - Reference point (`ref_lat`, `ref_lon`): the origin of the plane
//!
//! Planar coordinates are metres east and north of the reference point.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::{ProjectionError, Result};

/// Earth radius used by WRF (metres).
pub const EARTH_RADIUS: f64 = 6_370_000.0;

/// Spherical Lambert Conformal Conic projection.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Standard longitude in radians
    lon0: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant, pre-multiplied by the Earth radius
    rf: f64,
    /// Rho at the reference latitude
    rho0: f64,
    /// Unshifted planar coordinates of the reference point
    origin: (f64, f64),
}

impl LambertConformal {
    /// Create a projection from WRF geometry parameters, all in degrees.
    pub fn new(
        truelat1: f64,
        truelat2: f64,
        stand_lon: f64,
        ref_lat: f64,
        ref_lon: f64,
    ) -> Result<Self> {
        Self::with_radius(truelat1, truelat2, stand_lon, ref_lat, ref_lon, EARTH_RADIUS)
    }

    pub fn with_radius(
        truelat1: f64,
        truelat2: f64,
        stand_lon: f64,
        ref_lat: f64,
        ref_lon: f64,
        earth_radius: f64,
    ) -> Result<Self> {
        check_latitude("truelat1", truelat1)?;
        check_latitude("truelat2", truelat2)?;
        check_latitude("ref_lat", ref_lat)?;
        check_finite("stand_lon", stand_lon)?;
        check_finite("ref_lon", ref_lon)?;
        if !(earth_radius.is_finite() && earth_radius > 0.0) {
            return Err(ProjectionError::InvalidParameter {
                name: "earth_radius",
                value: earth_radius,
            });
        }

        let phi1 = truelat1.to_radians();
        let phi2 = truelat2.to_radians();

        let n = if (phi1 - phi2).abs() < 1e-10 {
            // Tangent cone
            phi1.sin()
        } else {
            (phi1.cos() / phi2.cos()).ln() / (half_tan(phi2) / half_tan(phi1)).ln()
        };
        if n.abs() < 1e-12 || !n.is_finite() {
            return Err(ProjectionError::DegenerateCone(truelat1, truelat2));
        }

        let rf = earth_radius * phi1.cos() * half_tan(phi1).powf(n) / n;
        let rho0 = rf / half_tan(ref_lat.to_radians()).powf(n);

        let mut proj = Self {
            lon0: stand_lon.to_radians(),
            n,
            rf,
            rho0,
            origin: (0.0, 0.0),
        };
        proj.origin = proj.raw_forward(ref_lat, ref_lon);
        Ok(proj)
    }

    /// Convert geographic coordinates (degrees) to metres from the
    /// reference point.
    ///
    /// Returns (x, y).
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let (x, y) = self.raw_forward(lat_deg, lon_deg);
        (x - self.origin.0, y - self.origin.1)
    }

    /// Convert metres from the reference point back to geographic
    /// coordinates.
    ///
    /// Returns (lat, lon) in degrees, longitude in [-180, 180).
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x + self.origin.0;
        let y = y + self.origin.1;
        let sign = self.n.signum();

        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);

        let lat = if rho == 0.0 {
            sign * FRAC_PI_2
        } else {
            2.0 * (self.rf / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        let lon = normalize_lon(self.lon0 + theta / self.n);

        (lat.to_degrees(), lon.to_degrees())
    }

    fn raw_forward(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = normalize_lon(lon_deg.to_radians() - self.lon0);

        let rho = self.rf / half_tan(lat).powf(self.n);
        let theta = self.n * dlon;

        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }
}

fn half_tan(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan()
}

/// Normalize a longitude difference to [-π, π)
fn normalize_lon(lon: f64) -> f64 {
    (lon + PI).rem_euclid(2.0 * PI) - PI
}

/// Poles are rejected: the cone constant or rho0 would be undefined.
fn check_latitude(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value.abs() < 90.0 {
        Ok(())
    } else {
        Err(ProjectionError::InvalidParameter { name, value })
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidParameter { name, value })
    }
}
