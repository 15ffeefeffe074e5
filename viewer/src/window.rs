//! SDL2 window and event loop for a viewing session.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::{FullscreenType, WindowContext};
use skyview::render::frame_to_rgb;
use skyview::{FrameRenderer, InputEvent, Key, Outcome, Session, Viewport};

/// Target delay between frames, roughly 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub trait SdlResultExt<T> {
    fn sdl_context(self, msg: &str) -> Result<T>;
}

impl<T> SdlResultExt<T> for std::result::Result<T, String> {
    fn sdl_context(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow::anyhow!("{msg}: {e}"))
    }
}

/// Map an SDL event onto the view's input vocabulary.
pub fn translate_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => translate_key(*keycode),
        Event::MouseButtonDown {
            mouse_btn: MouseButton::Left,
            x,
            y,
            ..
        } => Some(InputEvent::MouseLeft {
            x: *x as f64,
            y: *y as f64,
        }),
        Event::Window {
            win_event: WindowEvent::SizeChanged(width, height),
            ..
        } => Some(InputEvent::Resize {
            width: (*width).max(1) as u32,
            height: (*height).max(1) as u32,
        }),
        _ => None,
    }
}

fn translate_key(keycode: Keycode) -> Option<InputEvent> {
    let key = match keycode {
        Keycode::Escape => return Some(InputEvent::Quit),
        Keycode::F => Key::ToggleFullscreen,
        Keycode::Plus | Keycode::Equals | Keycode::KpPlus => Key::ZoomIn,
        Keycode::Minus | Keycode::KpMinus => Key::ZoomOut,
        Keycode::Up => Key::PanUp,
        Keycode::Down => Key::PanDown,
        Keycode::Left => Key::PanLeft,
        Keycode::Right => Key::PanRight,
        Keycode::F2 => Key::Snapshot,
        _ => return None,
    };
    Some(InputEvent::Key(key))
}

fn streaming_texture(
    creator: &TextureCreator<WindowContext>,
    viewport: Viewport,
) -> Result<Texture<'_>> {
    creator
        .create_texture_streaming(PixelFormatEnum::RGB24, viewport.width, viewport.height)
        .map_err(|e| anyhow::anyhow!("Failed to create texture: {e}"))
}

fn apply_surface(canvas: &mut WindowCanvas, fullscreen: bool, viewport: Viewport) -> Result<()> {
    let window = canvas.window_mut();
    if fullscreen {
        window
            .set_fullscreen(FullscreenType::Desktop)
            .sdl_context("Failed to enter fullscreen")?;
    } else {
        window
            .set_fullscreen(FullscreenType::Off)
            .sdl_context("Failed to leave fullscreen")?;
        window
            .set_size(viewport.width, viewport.height)
            .map_err(|e| anyhow::anyhow!("Failed to resize window: {e}"))?;
    }
    debug!("Surface is now {viewport} (fullscreen: {fullscreen})");
    Ok(())
}

/// Open a window for `session` and run until the user quits.
pub fn run(mut session: Session) -> Result<()> {
    let sdl_context = sdl2::init().sdl_context("SDL init failed")?;
    let video_subsystem = sdl_context
        .video()
        .sdl_context("Video subsystem init failed")?;

    let mode = video_subsystem
        .desktop_display_mode(0)
        .sdl_context("Failed to get display mode")?;
    session.set_display(Viewport::new(mode.w.max(1) as u32, mode.h.max(1) as u32));

    let viewport = session.view().viewport();
    let window = video_subsystem
        .window(&session.title(), viewport.width, viewport.height)
        .position_centered()
        .resizable()
        .build()
        .context("Failed to create window")?;

    let mut canvas = window
        .into_canvas()
        .build()
        .context("Failed to create canvas")?;
    let texture_creator = canvas.texture_creator();
    let mut texture = streaming_texture(&texture_creator, viewport)?;
    let mut texture_size = viewport;

    let mut renderer = FrameRenderer::new(viewport)?;
    let mut event_pump = sdl_context
        .event_pump()
        .sdl_context("Failed to get event pump")?;

    info!("Viewer open at {viewport}");

    'running: loop {
        for event in event_pump.poll_iter() {
            let Some(input) = translate_event(&event) else {
                continue;
            };
            match session.handle_event(input) {
                Outcome::Continue => {}
                Outcome::Quit => break 'running,
                Outcome::SurfaceChanged {
                    fullscreen,
                    viewport,
                } => {
                    if matches!(input, InputEvent::Key(Key::ToggleFullscreen)) {
                        apply_surface(&mut canvas, fullscreen, viewport)?;
                    }
                }
                Outcome::SaveSnapshot => session.save_snapshot(renderer.frame(), Instant::now()),
            }
        }

        session.poll_loading();

        let frame = renderer.render(&session.scene(Instant::now()))?;
        let frame_size = Viewport::new(frame.width(), frame.height());
        if frame_size != texture_size {
            texture = streaming_texture(&texture_creator, frame_size)?;
            texture_size = frame_size;
        }

        texture
            .update(None, &frame_to_rgb(frame), frame_size.width as usize * 3)
            .map_err(|e| anyhow::anyhow!("Failed to update texture: {e}"))?;

        canvas.clear();
        canvas
            .copy(&texture, None, None)
            .sdl_context("Failed to copy texture")?;
        canvas.present();

        thread::sleep(FRAME_INTERVAL);
    }

    info!("Viewer closed");
    Ok(())
}
