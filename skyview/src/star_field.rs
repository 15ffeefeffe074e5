//! The in-memory set of stars plotted around a reference exoplanet.
//!
//! A [`StarField`] is built once per session from the rows returned by a
//! [`CatalogSource`]. Rows missing position, parallax or either magnitude are
//! dropped, as are rows whose planar separation from the reference reaches the
//! inclusion threshold. Fetch failures degrade to an empty field so the view
//! can still show the reference point.

use std::collections::HashSet;
use std::fmt;

use log::{debug, info, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinates::{angular_separation, SkyPoint};
use crate::photometry::{star_color, Rgb};

/// Default cone radius handed to the catalog source, in degrees
pub const DEFAULT_SEARCH_RADIUS_DEG: f64 = 1.0;

/// Stars at or beyond this planar separation from the reference are dropped
pub const INCLUSION_THRESHOLD: f64 = 1000.0;

/// Errors a catalog source can report
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed catalog response: {0}")]
    Malformed(String),

    #[error("Catalog worker stopped before delivering a result")]
    WorkerLost,
}

/// Opaque catalog identifier, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StarId(pub u64);

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw catalog row. Any field other than the id may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub source_id: u64,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
    pub parallax: Option<f64>,
    pub phot_bp_mean_mag: Option<f64>,
    pub phot_rp_mean_mag: Option<f64>,
}

/// The exoplanet the view is centred on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub name: String,
    pub position: SkyPoint,
}

impl ReferencePoint {
    pub fn new(name: impl Into<String>, position: SkyPoint) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Unit-radius Cartesian direction of the reference
    pub fn cartesian(&self) -> Vector3<f64> {
        self.position.to_cartesian(1.0)
    }
}

/// Parameters controlling a star field load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldParams {
    /// Cone radius passed to the catalog source, in degrees
    pub search_radius_deg: f64,
    /// Planar separation at which stars are dropped
    pub inclusion_threshold: f64,
}

impl Default for StarFieldParams {
    fn default() -> Self {
        Self {
            search_radius_deg: DEFAULT_SEARCH_RADIUS_DEG,
            inclusion_threshold: INCLUSION_THRESHOLD,
        }
    }
}

/// Data source contract for the star field.
///
/// Given the reference position and a cone radius, return zero or more rows.
/// Implemented for plain closures so tests and offline tools can supply rows
/// directly.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self, center: SkyPoint, radius_deg: f64) -> Result<Vec<CatalogRow>, FetchError>;
}

impl<F> CatalogSource for F
where
    F: Fn(SkyPoint, f64) -> Result<Vec<CatalogRow>, FetchError> + Send + Sync,
{
    fn fetch(&self, center: SkyPoint, radius_deg: f64) -> Result<Vec<CatalogRow>, FetchError> {
        self(center, radius_deg)
    }
}

/// A star ready for projection and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    id: StarId,
    position: SkyPoint,
    parallax: f64,
    separation: f64,
    cartesian: Vector3<f64>,
    color: Rgb,
    temperature: Option<f64>,
}

impl Star {
    /// Assemble a star from already-derived values.
    pub fn from_parts(
        id: StarId,
        position: SkyPoint,
        parallax: f64,
        separation: f64,
        cartesian: Vector3<f64>,
        color: Rgb,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            id,
            position,
            parallax,
            separation,
            cartesian,
            color,
            temperature,
        }
    }

    pub fn id(&self) -> StarId {
        self.id
    }

    pub fn position(&self) -> SkyPoint {
        self.position
    }

    /// Raw parallax, which doubles as the Cartesian radius
    pub fn parallax(&self) -> f64 {
        self.parallax
    }

    /// Planar separation from the reference point
    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn cartesian(&self) -> &Vector3<f64> {
        &self.cartesian
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Estimated effective temperature, if the photometry allowed one
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }
}

/// Why a catalog row did not make it into the field
enum Rejection {
    Incomplete,
    BadPosition,
    OutsideThreshold,
    Duplicate,
}

/// Immutable set of stars for one viewing session, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a field from raw rows.
    ///
    /// Row order is preserved, which keeps picking and drawing order stable.
    pub fn from_rows(
        reference: &ReferencePoint,
        rows: &[CatalogRow],
        params: &StarFieldParams,
    ) -> Self {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut stars = Vec::with_capacity(rows.len());
        let (mut incomplete, mut bad_position, mut outside, mut duplicate) = (0, 0, 0, 0);

        for row in rows {
            match Self::star_from_row(reference, row, params, &seen) {
                Ok(star) => {
                    seen.insert(star.id);
                    stars.push(star);
                }
                Err(Rejection::Incomplete) => incomplete += 1,
                Err(Rejection::BadPosition) => bad_position += 1,
                Err(Rejection::OutsideThreshold) => outside += 1,
                Err(Rejection::Duplicate) => duplicate += 1,
            }
        }

        info!(
            "Star field for {}: kept {} of {} rows ({} incomplete, {} bad position, {} outside threshold, {} duplicate)",
            reference.name,
            stars.len(),
            rows.len(),
            incomplete,
            bad_position,
            outside,
            duplicate
        );

        Self { stars }
    }

    fn star_from_row(
        reference: &ReferencePoint,
        row: &CatalogRow,
        params: &StarFieldParams,
        seen: &HashSet<StarId>,
    ) -> Result<Star, Rejection> {
        let (Some(ra), Some(dec), Some(parallax), Some(bp), Some(rp)) = (
            row.ra,
            row.dec,
            row.parallax,
            row.phot_bp_mean_mag,
            row.phot_rp_mean_mag,
        ) else {
            return Err(Rejection::Incomplete);
        };

        if ![parallax, bp, rp].iter().all(|v| v.is_finite()) {
            return Err(Rejection::Incomplete);
        }

        let position = SkyPoint::new(ra, dec).map_err(|e| {
            debug!("Dropping catalog row {}: {e}", row.source_id);
            Rejection::BadPosition
        })?;

        let separation = angular_separation(&reference.position, &position);
        if separation >= params.inclusion_threshold {
            return Err(Rejection::OutsideThreshold);
        }

        let id = StarId(row.source_id);
        if seen.contains(&id) {
            return Err(Rejection::Duplicate);
        }

        let (color, temperature) = star_color(bp, rp);

        Ok(Star {
            id,
            position,
            parallax,
            separation,
            cartesian: position.to_cartesian(parallax),
            color,
            temperature,
        })
    }

    /// Fetch rows around the reference and build the field, reporting fetch errors.
    pub fn try_load(
        reference: &ReferencePoint,
        source: &dyn CatalogSource,
        params: &StarFieldParams,
    ) -> Result<Self, FetchError> {
        let rows = source.fetch(reference.position, params.search_radius_deg)?;
        Ok(Self::from_rows(reference, &rows, params))
    }

    /// Fetch rows around the reference and build the field.
    ///
    /// Never fails: a fetch error is logged and yields an empty field.
    pub fn load(
        reference: &ReferencePoint,
        source: &dyn CatalogSource,
        params: &StarFieldParams,
    ) -> Self {
        Self::try_load(reference, source, params).unwrap_or_else(|e| {
            warn!("Star catalog fetch for {} failed: {e}", reference.name);
            Self::empty()
        })
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn get(&self, id: StarId) -> Option<&Star> {
        self.stars.iter().find(|star| star.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Rows = Result<Vec<CatalogRow>, FetchError>;

    fn reference() -> ReferencePoint {
        ReferencePoint::new("Test b", SkyPoint::new(100.0, 20.0).unwrap())
    }

    fn row(id: u64, ra: f64, dec: f64) -> CatalogRow {
        CatalogRow {
            source_id: id,
            ra: Some(ra),
            dec: Some(dec),
            parallax: Some(2.0),
            phot_bp_mean_mag: Some(12.8),
            phot_rp_mean_mag: Some(12.0),
        }
    }

    #[test]
    fn test_zero_rows_is_empty() {
        let source = |_: SkyPoint, _: f64| -> Rows { Ok(Vec::new()) };
        let field = StarField::load(&reference(), &source, &StarFieldParams::default());
        assert!(field.is_empty());
    }

    #[test]
    fn test_fetch_error_is_empty() {
        let source = |_: SkyPoint, _: f64| -> Rows {
            Err(FetchError::Unavailable("connection refused".to_string()))
        };
        let field = StarField::load(&reference(), &source, &StarFieldParams::default());
        assert!(field.is_empty());

        let err = StarField::try_load(&reference(), &source, &StarFieldParams::default());
        assert!(matches!(err, Err(FetchError::Unavailable(_))));
    }

    #[test]
    fn test_source_receives_reference_and_radius() {
        let source = |center: SkyPoint, radius: f64| -> Rows {
            assert_relative_eq!(center.ra(), 100.0);
            assert_relative_eq!(center.dec(), 20.0);
            assert_relative_eq!(radius, 0.75);
            Ok(vec![row(1, 100.1, 20.1)])
        };
        let params = StarFieldParams {
            search_radius_deg: 0.75,
            ..Default::default()
        };
        let field = StarField::load(&reference(), &source, &params);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let mut no_parallax = row(2, 100.0, 20.0);
        no_parallax.parallax = None;
        let mut no_bp = row(3, 100.0, 20.0);
        no_bp.phot_bp_mean_mag = None;
        let mut no_rp = row(4, 100.0, 20.0);
        no_rp.phot_rp_mean_mag = None;
        let mut no_ra = row(5, 100.0, 20.0);
        no_ra.ra = None;
        let mut nan_parallax = row(6, 100.0, 20.0);
        nan_parallax.parallax = Some(f64::NAN);

        let rows = vec![row(1, 100.0, 20.0), no_parallax, no_bp, no_rp, no_ra, nan_parallax];
        let field = StarField::from_rows(&reference(), &rows, &StarFieldParams::default());

        assert_eq!(field.len(), 1);
        assert_eq!(field.stars()[0].id(), StarId(1));
    }

    #[test]
    fn test_inclusion_threshold() {
        let params = StarFieldParams {
            inclusion_threshold: 5.0,
            ..Default::default()
        };
        // Separations: 1, 5 (boundary, excluded), ~7.07
        let rows = vec![row(1, 101.0, 20.0), row(2, 105.0, 20.0), row(3, 105.0, 25.0)];
        let field = StarField::from_rows(&reference(), &rows, &params);

        assert_eq!(field.len(), 1);
        assert!(field.stars().iter().all(|s| s.separation() < 5.0));
    }

    #[test]
    fn test_duplicates_and_bad_positions_dropped() {
        let rows = vec![row(1, 100.0, 20.0), row(1, 100.5, 20.5), row(2, 100.0, 95.0)];
        let field = StarField::from_rows(&reference(), &rows, &StarFieldParams::default());

        assert_eq!(field.len(), 1);
        assert_relative_eq!(field.stars()[0].position().ra(), 100.0);
    }

    #[test]
    fn test_derived_fields() {
        let field =
            StarField::from_rows(&reference(), &[row(9, 103.0, 24.0)], &StarFieldParams::default());
        let star = field.get(StarId(9)).unwrap();

        assert_relative_eq!(star.separation(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(star.parallax(), 2.0);
        assert_relative_eq!(star.cartesian().norm(), 2.0, epsilon = 1e-9);
        assert!(star.temperature().is_some());
        assert_ne!(star.color(), crate::photometry::NEUTRAL_COLOR);
    }

    #[test]
    fn test_order_preserved() {
        let rows = vec![row(5, 100.0, 20.0), row(1, 100.2, 20.0), row(3, 100.4, 20.0)];
        let field = StarField::from_rows(&reference(), &rows, &StarFieldParams::default());
        let ids: Vec<u64> = field.stars().iter().map(|s| s.id().0).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn test_reference_cartesian_is_unit() {
        assert_relative_eq!(reference().cartesian().norm(), 1.0, epsilon = 1e-12);
    }
}
