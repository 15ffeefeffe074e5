//! Sky coordinate handling for the star-field view.
//!
//! Catalog positions arrive as right ascension / declination in degrees plus a
//! parallax value. The view places every star in a Cartesian frame whose
//! radius is the raw parallax (larger parallax = farther from the origin in
//! this model). That is a deliberate display approximation, not a distance in
//! parsecs.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing sky positions
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Non-finite sky coordinate: ra={ra}, dec={dec}")]
    NonFinite { ra: f64, dec: f64 },

    #[error("Declination {0} outside [-90, 90] degrees")]
    DeclinationOutOfRange(f64),
}

/// A position on the celestial sphere in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    ra_deg: f64,
    dec_deg: f64,
}

impl SkyPoint {
    /// Create a sky point, wrapping right ascension into [0, 360).
    ///
    /// # Arguments
    /// * `ra_deg` - Right ascension in degrees (any finite value)
    /// * `dec_deg` - Declination in degrees, must lie within [-90, 90]
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Self, CoordinateError> {
        if !ra_deg.is_finite() || !dec_deg.is_finite() {
            return Err(CoordinateError::NonFinite {
                ra: ra_deg,
                dec: dec_deg,
            });
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(CoordinateError::DeclinationOutOfRange(dec_deg));
        }

        // rem_euclid can round up to exactly 360 for tiny negative inputs
        let mut ra_deg = ra_deg.rem_euclid(360.0);
        if ra_deg >= 360.0 {
            ra_deg = 0.0;
        }

        Ok(Self { ra_deg, dec_deg })
    }

    /// Right ascension in degrees, within [0, 360)
    pub fn ra(&self) -> f64 {
        self.ra_deg
    }

    /// Declination in degrees, within [-90, 90]
    pub fn dec(&self) -> f64 {
        self.dec_deg
    }

    /// Cartesian position of this point at the given radius
    pub fn to_cartesian(&self, radius: f64) -> Vector3<f64> {
        to_cartesian(self.ra_deg, self.dec_deg, radius)
    }
}

impl fmt::Display for SkyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {:.4}°, Dec {:+.4}°", self.ra_deg, self.dec_deg)
    }
}

/// Convert right ascension, declination and a radius into Cartesian coordinates.
///
/// The x axis points at (ra=0, dec=0), the y axis at (ra=90, dec=0) and the z
/// axis at the celestial north pole. The mapping is linear in `radius`.
///
/// # Arguments
/// * `ra_deg` - Right ascension in degrees
/// * `dec_deg` - Declination in degrees
/// * `radius` - Distance proxy; the star field passes raw parallax here
///
/// # Returns
/// The (x, y, z) position
pub fn to_cartesian(ra_deg: f64, dec_deg: f64, radius: f64) -> Vector3<f64> {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();

    Vector3::new(
        radius * ra.cos() * dec.cos(),
        radius * ra.sin() * dec.cos(),
        radius * dec.sin(),
    )
}

/// Planar separation between two sky points, in degrees.
///
/// This is the Euclidean distance in (ra, dec) degree space, not a great-circle
/// distance. It ignores RA wrap-around and the cos(dec) shrink of RA lines, so
/// it is only good for coarse "is this star near the target" filtering.
pub fn angular_separation(a: &SkyPoint, b: &SkyPoint) -> f64 {
    let d_ra = a.ra() - b.ra();
    let d_dec = a.dec() - b.dec();
    (d_ra * d_ra + d_dec * d_dec).sqrt()
}

/// Great-circle separation between two sky points, in degrees.
///
/// Handles RA wrap-around and convergence near the poles, unlike
/// [`angular_separation`]. Used for catalog cone searches.
pub fn great_circle_separation(a: &SkyPoint, b: &SkyPoint) -> f64 {
    a.to_cartesian(1.0).angle(&b.to_cartesian(1.0)).to_degrees()
}
