//! Frame rendering into an owned tiny-skia pixmap.
//!
//! Each frame is cleared to black, stars are drawn back to front in store
//! order, then the SVG overlay is rasterised on top. The renderer keeps the
//! last frame so the snapshot writer can save exactly what was shown.

pub mod overlay;
pub mod stars;

use std::sync::Arc;

use image::RgbImage;
use log::warn;
use thiserror::Error;
use tiny_skia::{Color, Pixmap, Transform};
use usvg::{fontdb, Options, Tree};

use crate::projection::Viewport;
use crate::star_field::Star;
use crate::view::ViewState;

pub use overlay::{overlay_svg, HELP_TEXT};

/// Font used for overlay text when available
pub const OVERLAY_FONT: &str = "DejaVu Sans";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {0} frame")]
    InvalidSize(Viewport),

    #[error("Overlay SVG rejected: {0}")]
    Overlay(#[from] usvg::Error),
}

/// Everything drawn in one frame.
pub struct Scene<'a> {
    pub stars: &'a [Star],
    pub view: &'a ViewState,
    pub reference_name: &'a str,
    pub selected: Option<&'a Star>,
    pub status: Option<&'a str>,
}

/// Owns the frame buffer and overlay text settings.
pub struct FrameRenderer {
    pixmap: Pixmap,
    options: Options<'static>,
}

impl FrameRenderer {
    /// Create a renderer with system fonts loaded for the overlay.
    pub fn new(viewport: Viewport) -> Result<Self, RenderError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            warn!("No system fonts found, overlay text will not be drawn");
        }

        let options = Options {
            fontdb: Arc::new(db),
            font_family: OVERLAY_FONT.to_string(),
            ..Default::default()
        };
        Self::with_options(viewport, options)
    }

    /// Create a renderer with caller-supplied overlay options.
    pub fn with_options(viewport: Viewport, options: Options<'static>) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: allocate(viewport)?,
            options,
        })
    }

    /// Size of the frame buffer
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Reallocate the frame buffer when the surface size changes.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        if viewport != self.viewport() {
            self.pixmap = allocate(viewport)?;
        }
        Ok(())
    }

    /// Last rendered frame
    pub fn frame(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Draw `scene` and return the finished frame.
    ///
    /// An overlay that fails to parse is logged and skipped; the star layer is
    /// still returned.
    pub fn render(&mut self, scene: &Scene) -> Result<&Pixmap, RenderError> {
        self.resize(scene.view.viewport())?;
        self.pixmap.fill(Color::BLACK);

        for star in scene.stars {
            stars::draw_star(&mut self.pixmap, star, scene.view);
        }

        if let Err(e) = self.draw_overlay(scene) {
            warn!("Skipping overlay for this frame: {e}");
        }

        Ok(&self.pixmap)
    }

    fn draw_overlay(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let svg = overlay_svg(
            self.viewport(),
            scene.reference_name,
            scene.selected,
            scene.status,
        );
        let tree = Tree::from_str(&svg, &self.options)?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());
        Ok(())
    }
}

fn allocate(viewport: Viewport) -> Result<Pixmap, RenderError> {
    Pixmap::new(viewport.width, viewport.height).ok_or(RenderError::InvalidSize(viewport))
}

/// Packed RGB24 bytes of a frame, row-major, for texture upload.
pub fn frame_to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixmap.pixels().len() * 3);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgb.extend_from_slice(&[color.red(), color.green(), color.blue()]);
    }
    rgb
}

/// A frame as an `image` RGB buffer.
pub fn frame_to_image(pixmap: &Pixmap) -> Option<RgbImage> {
    RgbImage::from_raw(pixmap.width(), pixmap.height(), frame_to_rgb(pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::SkyPoint;
    use crate::photometry::Rgb;
    use crate::star_field::{ReferencePoint, StarId};
    use crate::view::ViewConfig;
    use nalgebra::Vector3;

    /// Renderer without system fonts so tests stay fast and deterministic
    fn renderer(viewport: Viewport) -> FrameRenderer {
        FrameRenderer::with_options(viewport, Options::default()).unwrap()
    }

    fn view() -> ViewState {
        let reference = ReferencePoint::new("Pole b", SkyPoint::new(0.0, 90.0).unwrap());
        ViewState::new(&reference, &ViewConfig::default())
    }

    fn star_at(id: u64, x: f64, y: f64, color: Rgb) -> Star {
        Star::from_parts(
            StarId(id),
            SkyPoint::new(0.0, 0.0).unwrap(),
            1.0,
            0.0,
            Vector3::new(x, y, 0.0),
            color,
            None,
        )
    }

    fn pixel_rgb(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let pixel = pixmap.pixel(x, y).unwrap().demultiply();
        (pixel.red(), pixel.green(), pixel.blue())
    }

    #[test]
    fn test_empty_field_draws_marker_on_black() {
        let view = view();
        let mut renderer = renderer(view.viewport());
        let scene = Scene {
            stars: &[],
            view: &view,
            reference_name: "Pole b",
            selected: None,
            status: None,
        };

        let frame = renderer.render(&scene).unwrap();
        assert_eq!(pixel_rgb(frame, 400, 300), (255, 255, 255));
        assert_eq!(pixel_rgb(frame, 5, 5), (0, 0, 0));
        assert_eq!(pixel_rgb(frame, 790, 590), (0, 0, 0));
    }

    #[test]
    fn test_star_core_uses_brightened_color() {
        let view = view();
        let mut renderer = renderer(view.viewport());
        let color = Rgb::new(120, 80, 55);
        let field = [star_at(1, 1.0, 0.0, color)];
        let scene = Scene {
            stars: &field,
            view: &view,
            reference_name: "Pole b",
            selected: None,
            status: None,
        };

        // (1, 0, 0) projects to (475, 300)
        let frame = renderer.render(&scene).unwrap();
        let core = crate::photometry::lighten(color, stars::CORE_BRIGHTEN);
        assert_eq!(pixel_rgb(frame, 475, 300), (core.r, core.g, core.b));

        // Glow halo is dimmer than the core but not black
        let (r, _, _) = pixel_rgb(frame, 475 + 7, 300);
        assert!(r > 0 && r < core.r);
    }

    #[test]
    fn test_frame_follows_viewport() {
        let mut view = view();
        let mut renderer = renderer(view.viewport());
        view.resize(Viewport::new(320, 200));

        let scene = Scene {
            stars: &[],
            view: &view,
            reference_name: "Pole b",
            selected: None,
            status: None,
        };
        let frame = renderer.render(&scene).unwrap();
        assert_eq!((frame.width(), frame.height()), (320, 200));
    }

    #[test]
    fn test_frame_to_rgb_layout() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(Color::from_rgba8(10, 20, 30, 255));

        assert_eq!(frame_to_rgb(&pixmap), vec![10, 20, 30, 10, 20, 30]);
        let image = frame_to_image(&pixmap).unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [10, 20, 30]);
    }
}
