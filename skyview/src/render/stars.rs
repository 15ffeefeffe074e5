//! Star glow and core drawing on the frame pixmap.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::photometry::{lighten, Rgb};
use crate::projection::{project, star_radius, ScreenPoint, Viewport};
use crate::star_field::Star;
use crate::view::ViewState;

/// Number of glow rings drawn behind each star core
pub const GLOW_RINGS: u32 = 3;

/// Lightening applied to the star colour for the glow rings
pub const GLOW_LIGHTEN: f64 = 1.3;

/// Lightening applied to the star colour for the solid core
pub const CORE_BRIGHTEN: f64 = 1.8;

/// Depth attenuation never fades a star below this opacity
pub const MIN_OPACITY: f64 = 0.3;

/// Extra pixels beyond the glow radius before a star is culled
pub const CULL_SLACK: f64 = 16.0;

/// Depth attenuation `max(1 − sqrt(|z|/300), 0.3)`.
pub fn depth_opacity(z: f64) -> f64 {
    (1.0 - (z.abs() / 300.0).sqrt()).max(MIN_OPACITY)
}

/// Radius of glow ring `i` (1 = innermost)
pub fn glow_radius(ring: u32, z: f64) -> f64 {
    3.0 * ring as f64 + 0.5 * z.abs()
}

/// Glow rings from the outermost inward, as (radius, alpha in [0, 1]).
///
/// Alpha grows toward the core: ring `i` gets `(5 − i)/6` of the depth
/// opacity.
pub fn glow_rings(z: f64) -> impl Iterator<Item = (f64, f64)> {
    let opacity = depth_opacity(z);
    (1..=GLOW_RINGS)
        .rev()
        .map(move |ring| (glow_radius(ring, z), (5 - ring) as f64 / 6.0 * opacity))
}

fn alpha_u8(alpha: f64) -> u8 {
    (alpha * 255.0).round().clamp(0.0, 255.0) as u8
}

fn fill_circle(pixmap: &mut Pixmap, x: f64, y: f64, radius: f64, color: Rgb, alpha: u8) {
    let Some(path) = PathBuilder::from_circle(x as f32, y as f32, radius as f32) else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;

    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}

/// Whether a star centred at `(x, y)` can touch the viewport at all
fn is_visible(viewport: Viewport, x: f64, y: f64, z: f64) -> bool {
    let centre = ScreenPoint::new(x, y);
    centre.is_finite()
        && viewport.contains_with_margin(centre, glow_radius(GLOW_RINGS, z) + CULL_SLACK)
}

/// Draw one star's glow and core. Returns false when the star was culled.
pub fn draw_star(pixmap: &mut Pixmap, star: &Star, view: &ViewState) -> bool {
    let position = star.cartesian();
    let centre = project(position, view.viewport(), view.pan(), view.zoom());
    if !is_visible(view.viewport(), centre.x, centre.y, position.z) {
        return false;
    }

    let glow = lighten(star.color(), GLOW_LIGHTEN);
    for (radius, alpha) in glow_rings(position.z) {
        fill_circle(pixmap, centre.x, centre.y, radius, glow, alpha_u8(alpha));
    }

    let core = lighten(star.color(), CORE_BRIGHTEN);
    fill_circle(
        pixmap,
        centre.x,
        centre.y,
        star_radius(position.z),
        core,
        u8::MAX,
    );

    true
}
