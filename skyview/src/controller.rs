//! Interaction controller: applies one input event at a time to the view.
//!
//! Events are window-system neutral. The viewer translates SDL events into
//! [`InputEvent`]s and acts on the returned [`Outcome`] (quitting, resizing
//! the surface or writing a snapshot).

use nalgebra::Vector2;

use crate::projection::{hit_test, ScreenPoint, Viewport};
use crate::star_field::Star;
use crate::view::ViewState;

/// Discrete key actions the view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ToggleFullscreen,
    ZoomIn,
    ZoomOut,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    Snapshot,
}

/// One input event from the window system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    MouseLeft { x: f64, y: f64 },
    Key(Key),
    Resize { width: u32, height: u32 },
}

/// What the window glue has to do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// The drawing surface must be recreated at `viewport`
    SurfaceChanged { fullscreen: bool, viewport: Viewport },
    SaveSnapshot,
}

/// Apply `event` to `state`.
///
/// # Arguments
/// * `state` - View state to mutate
/// * `stars` - Current star field, in store order, for picking
/// * `display` - Full display resolution, used when entering fullscreen
/// * `event` - The input event
pub fn handle_event(
    state: &mut ViewState,
    stars: &[Star],
    display: Viewport,
    event: InputEvent,
) -> Outcome {
    match event {
        InputEvent::Quit => Outcome::Quit,
        InputEvent::MouseLeft { x, y } => {
            if let Some(id) = hit_test(
                ScreenPoint::new(x, y),
                stars,
                state.viewport(),
                state.pan(),
                state.zoom(),
            ) {
                state.select(id);
            }
            Outcome::Continue
        }
        InputEvent::Resize { width, height } => {
            state.resize(Viewport::new(width, height));
            Outcome::SurfaceChanged {
                fullscreen: state.is_fullscreen(),
                viewport: state.viewport(),
            }
        }
        InputEvent::Key(key) => handle_key(state, display, key),
    }
}

fn handle_key(state: &mut ViewState, display: Viewport, key: Key) -> Outcome {
    match key {
        Key::ToggleFullscreen => {
            let viewport = state.toggle_fullscreen(display);
            Outcome::SurfaceChanged {
                fullscreen: state.is_fullscreen(),
                viewport,
            }
        }
        Key::ZoomIn => {
            state.zoom_in();
            Outcome::Continue
        }
        Key::ZoomOut => {
            state.zoom_out();
            Outcome::Continue
        }
        Key::Snapshot => Outcome::SaveSnapshot,
        Key::PanUp => pan(state, Vector2::new(0, 1)),
        Key::PanDown => pan(state, Vector2::new(0, -1)),
        // Left and Right move the pan against the screen direction
        Key::PanLeft => pan(state, Vector2::new(1, 0)),
        Key::PanRight => pan(state, Vector2::new(-1, 0)),
    }
}

fn pan(state: &mut ViewState, step: Vector2<i32>) -> Outcome {
    state.pan_steps(step.x, step.y);
    Outcome::Continue
}
