//! Mapping from the Cartesian star frame to viewport pixels, and back for picking.
//!
//! The projection is a depth cue rather than a camera model: each point is
//! scaled by `zoom / (4 + z)` around the viewport centre after adding the pan
//! offset. Screen y grows downward, so the Cartesian y axis is flipped.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::star_field::{Star, StarId};

/// Distance of the eye from the origin along z
pub const EYE_DEPTH: f64 = 4.0;

/// Smallest magnitude allowed for the `EYE_DEPTH + z` denominator
pub const MIN_DEPTH_DENOMINATOR: f64 = 1e-3;

/// Core radius of a star at z = 0, in pixels
pub const BASE_STAR_RADIUS: f64 = 3.0;

/// Extra radius per unit |z|
pub const DEPTH_RADIUS_SCALE: f64 = 0.5;

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Create a viewport; zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Pixel centre of the viewport
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Whether a point lies within `margin` pixels of the viewport
    pub fn contains_with_margin(&self, point: ScreenPoint, margin: f64) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x <= self.width as f64 + margin
            && point.y <= self.height as f64 + margin
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A position in viewport pixels (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Depth denominator `EYE_DEPTH + z`, kept away from zero with its sign preserved.
fn depth_denominator(z: f64) -> f64 {
    let depth = EYE_DEPTH + z;
    if depth.abs() < MIN_DEPTH_DENOMINATOR {
        MIN_DEPTH_DENOMINATOR.copysign(depth)
    } else {
        depth
    }
}

/// Project a Cartesian point onto the viewport.
///
/// `scale = zoom / (4 + z)`, `sx = w/2 + (x + pan.x)·scale`,
/// `sy = h/2 − (y + pan.y)·scale`. Points with z ≈ −4 use a clamped
/// denominator instead of dividing by zero.
pub fn project(
    position: &Vector3<f64>,
    viewport: Viewport,
    pan: &Vector2<f64>,
    zoom: f64,
) -> ScreenPoint {
    let scale = zoom / depth_denominator(position.z);
    let center = viewport.center();

    ScreenPoint::new(
        center.x + (position.x + pan.x) * scale,
        center.y - (position.y + pan.y) * scale,
    )
}

/// Rendered core radius of a star at depth `z`, also used as its pick radius.
pub fn star_radius(z: f64) -> f64 {
    BASE_STAR_RADIUS + DEPTH_RADIUS_SCALE * z.abs()
}

/// Find the star under a screen point.
///
/// Stars are tested in slice order and the first one whose projected centre
/// lies within its [`star_radius`] wins, so overlapping stars resolve
/// deterministically for a fixed star ordering.
pub fn hit_test(
    point: ScreenPoint,
    stars: &[Star],
    viewport: Viewport,
    pan: &Vector2<f64>,
    zoom: f64,
) -> Option<StarId> {
    stars
        .iter()
        .find(|star| {
            let position = star.cartesian();
            let projected = project(position, viewport, pan, zoom);
            let radius = star_radius(position.z);
            projected.is_finite() && projected.distance_squared(&point) <= radius * radius
        })
        .map(Star::id)
}
