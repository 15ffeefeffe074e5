//! Mutable view parameters consumed by the renderer each frame.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::projection::Viewport;
use crate::star_field::{ReferencePoint, StarId};

/// Tunables for a fresh [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Windowed width in pixels
    pub window_width: u32,
    /// Windowed height in pixels
    pub window_height: u32,
    pub initial_zoom: f64,
    /// Zoom change per key press
    pub zoom_step: f64,
    /// Zoom never drops below this
    pub min_zoom: f64,
    /// Pan change per arrow key press
    pub pan_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            initial_zoom: 300.0,
            zoom_step: 10.0,
            min_zoom: 50.0,
            pan_step: 1.0,
        }
    }
}

impl ViewConfig {
    pub fn window_viewport(&self) -> Viewport {
        Viewport::new(self.window_width, self.window_height)
    }
}

/// Pan, zoom, fullscreen, viewport and selection for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pan: Vector2<f64>,
    zoom: f64,
    fullscreen: bool,
    viewport: Viewport,
    windowed: Viewport,
    selected: Option<StarId>,
    zoom_step: f64,
    min_zoom: f64,
    pan_step: f64,
}

impl ViewState {
    /// Initial view for a reference point.
    ///
    /// The pan starts at the reference's unit-radius Cartesian (x, y).
    pub fn new(reference: &ReferencePoint, config: &ViewConfig) -> Self {
        let origin = reference.cartesian();
        let min_zoom = config.min_zoom.max(0.0);
        let window = config.window_viewport();

        Self {
            pan: Vector2::new(origin.x, origin.y),
            zoom: config.initial_zoom.max(min_zoom),
            fullscreen: false,
            viewport: window,
            windowed: window,
            selected: None,
            zoom_step: config.zoom_step,
            min_zoom,
            pan_step: config.pan_step,
        }
    }

    pub fn pan(&self) -> &Vector2<f64> {
        &self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Size to restore when leaving fullscreen
    pub fn windowed_size(&self) -> Viewport {
        self.windowed
    }

    pub fn selected(&self) -> Option<StarId> {
        self.selected
    }

    pub fn zoom_in(&mut self) {
        self.zoom += self.zoom_step;
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - self.zoom_step).max(self.min_zoom);
    }

    /// Shift the pan by whole steps along x and y.
    pub fn pan_steps(&mut self, dx: i32, dy: i32) {
        self.pan.x += dx as f64 * self.pan_step;
        self.pan.y += dy as f64 * self.pan_step;
    }

    pub fn select(&mut self, id: StarId) {
        self.selected = Some(id);
    }

    /// Flip fullscreen and return the new viewport.
    ///
    /// Entering fullscreen takes the display size; leaving it restores the
    /// last windowed size.
    pub fn toggle_fullscreen(&mut self, display: Viewport) -> Viewport {
        self.fullscreen = !self.fullscreen;
        self.viewport = if self.fullscreen {
            display
        } else {
            self.windowed
        };
        self.viewport
    }

    /// Record a new surface size reported by the window system.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.fullscreen {
            self.windowed = viewport;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::SkyPoint;
    use approx::assert_relative_eq;

    fn reference_at(ra: f64, dec: f64) -> ReferencePoint {
        ReferencePoint::new("Test b", SkyPoint::new(ra, dec).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new(&reference_at(0.0, 0.0), &ViewConfig::default());

        assert_relative_eq!(state.pan().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.pan().y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(state.zoom(), 300.0);
        assert!(!state.is_fullscreen());
        assert_eq!(state.viewport(), Viewport::new(800, 600));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_initial_pan_follows_reference() {
        let state = ViewState::new(&reference_at(90.0, 60.0), &ViewConfig::default());

        assert_relative_eq!(state.pan().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(state.pan().y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zoom_floor() {
        let mut state = ViewState::new(&reference_at(0.0, 0.0), &ViewConfig::default());
        for _ in 0..100 {
            state.zoom_out();
        }
        assert_relative_eq!(state.zoom(), 50.0);

        state.zoom_in();
        assert_relative_eq!(state.zoom(), 60.0);
    }

    #[test]
    fn test_fullscreen_restores_windowed_size() {
        let mut state = ViewState::new(&reference_at(0.0, 0.0), &ViewConfig::default());
        state.resize(Viewport::new(1024, 768));

        let full = state.toggle_fullscreen(Viewport::new(1920, 1080));
        assert_eq!(full, Viewport::new(1920, 1080));
        assert!(state.is_fullscreen());

        // Resizes while fullscreen do not overwrite the windowed size
        state.resize(Viewport::new(1920, 1200));
        assert_eq!(state.windowed_size(), Viewport::new(1024, 768));

        let windowed = state.toggle_fullscreen(Viewport::new(1920, 1080));
        assert_eq!(windowed, Viewport::new(1024, 768));
        assert!(!state.is_fullscreen());
    }

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let config: ViewConfig = serde_json::from_str(r#"{"initial_zoom": 120.0}"#).unwrap();
        assert_relative_eq!(config.initial_zoom, 120.0);
        assert_eq!(config.window_width, 800);
        assert_relative_eq!(config.min_zoom, 50.0);
    }
}
