//! Application state for one viewing session.
//!
//! A [`Session`] bundles the reference point, view state, star field, the
//! pending background load and the transient status line. The window loop
//! owns exactly one and passes it by reference to event handling and
//! rendering.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use tiny_skia::Pixmap;

use crate::controller::{handle_event, InputEvent, Outcome};
use crate::loader::{spawn_load, PendingStarField};
use crate::projection::Viewport;
use crate::render::Scene;
use crate::snapshot::{save_with_status, DEFAULT_SNAPSHOT_PATH};
use crate::star_field::{CatalogSource, ReferencePoint, Star, StarField, StarFieldParams};
use crate::view::{ViewConfig, ViewState};

pub const LOADING_STATUS: &str = "Loading nearby stars...";
pub const UNAVAILABLE_STATUS: &str = "Star catalog unavailable";

/// Settings that shape a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub view: ViewConfig,
    pub snapshot_path: PathBuf,
    /// How long snapshot confirmations stay on screen
    pub status_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            status_duration: Duration::from_secs(3),
        }
    }
}

/// Short-lived status text that hides the persistent status until it expires
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    expires: Instant,
}

pub struct Session {
    reference: ReferencePoint,
    view: ViewState,
    field: StarField,
    pending: Option<PendingStarField>,
    /// Load state: loading or catalog unavailable
    status: Option<&'static str>,
    notice: Option<Notice>,
    display: Viewport,
    config: SessionConfig,
}

impl Session {
    /// Start a session with an empty star field.
    ///
    /// # Arguments
    /// * `reference` - The exoplanet at the centre of the view
    /// * `config` - View and snapshot settings
    /// * `display` - Full display resolution, used for fullscreen
    pub fn new(reference: ReferencePoint, config: SessionConfig, display: Viewport) -> Self {
        let view = ViewState::new(&reference, &config.view);
        Self {
            reference,
            view,
            field: StarField::empty(),
            pending: None,
            status: None,
            notice: None,
            display,
            config,
        }
    }

    /// Kick off the background star load.
    pub fn start_loading(&mut self, source: Arc<dyn CatalogSource>, params: StarFieldParams) {
        info!("Loading stars around {} ({})", self.reference.name, self.reference.position);
        self.pending = Some(spawn_load(self.reference.clone(), source, params));
        self.status = Some(LOADING_STATUS);
    }

    /// Replace the star field directly.
    pub fn set_field(&mut self, field: StarField) {
        self.pending = None;
        self.field = field;
        self.clear_loading_status();
    }

    /// Pick up a finished background load. Returns true when the field changed.
    pub fn poll_loading(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let Some(result) = pending.poll() else {
            return false;
        };
        self.pending = None;

        match result {
            Ok(field) => {
                info!("{} stars around {}", field.len(), self.reference.name);
                self.field = field;
                self.clear_loading_status();
            }
            Err(e) => {
                warn!("Star catalog unavailable for {}: {e}", self.reference.name);
                self.field = StarField::empty();
                self.status = Some(UNAVAILABLE_STATUS);
            }
        }
        true
    }

    fn clear_loading_status(&mut self) {
        if self.status == Some(LOADING_STATUS) {
            self.status = None;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply one input event to the view.
    pub fn handle_event(&mut self, event: InputEvent) -> Outcome {
        handle_event(&mut self.view, self.field.stars(), self.display, event)
    }

    /// Update the display resolution used for fullscreen
    pub fn set_display(&mut self, display: Viewport) {
        self.display = display;
    }

    /// Write `frame` to the configured snapshot path and show the result.
    pub fn save_snapshot(&mut self, frame: &Pixmap, now: Instant) {
        let text = save_with_status(frame, &self.config.snapshot_path);
        self.notice = Some(Notice {
            text,
            expires: now + self.config.status_duration,
        });
    }

    /// Status text visible at `now`: a live notice, else the load status
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| now < notice.expires)
            .map(|notice| notice.text.as_str())
            .or(self.status)
    }

    pub fn selected_star(&self) -> Option<&Star> {
        self.view.selected().and_then(|id| self.field.get(id))
    }

    /// Everything the renderer needs for a frame at `now`
    pub fn scene(&self, now: Instant) -> Scene<'_> {
        Scene {
            stars: self.field.stars(),
            view: &self.view,
            reference_name: &self.reference.name,
            selected: self.selected_star(),
            status: self.status(now),
        }
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    /// Window title for this session
    pub fn title(&self) -> String {
        format!("Stars near {}", self.reference.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Key;
    use crate::coordinates::SkyPoint;
    use crate::star_field::{CatalogRow, FetchError, StarId};
    use tempfile::tempdir;

    type Rows = Result<Vec<CatalogRow>, FetchError>;

    const DISPLAY: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };

    fn reference() -> ReferencePoint {
        ReferencePoint::new("Pole b", SkyPoint::new(0.0, 90.0).unwrap())
    }

    fn wait_for_load(session: &mut Session) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !session.poll_loading() {
            assert!(Instant::now() < deadline, "load never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_loading_status_until_field_arrives() {
        let mut session = Session::new(reference(), SessionConfig::default(), DISPLAY);
        let source = Arc::new(|_: SkyPoint, _: f64| -> Rows {
            Ok(vec![CatalogRow {
                source_id: 77,
                ra: Some(0.0),
                dec: Some(0.0),
                parallax: Some(1.0),
                phot_bp_mean_mag: Some(11.0),
                phot_rp_mean_mag: Some(10.2),
            }])
        });

        session.start_loading(source, StarFieldParams::default());
        assert!(session.is_loading());
        assert_eq!(session.status(Instant::now()), Some(LOADING_STATUS));

        wait_for_load(&mut session);
        assert!(!session.is_loading());
        assert_eq!(session.field().len(), 1);
        assert_eq!(session.status(Instant::now()), None);
    }

    #[test]
    fn test_failed_load_shows_unavailable() {
        let mut session = Session::new(reference(), SessionConfig::default(), DISPLAY);
        let source = Arc::new(|_: SkyPoint, _: f64| -> Rows {
            Err(FetchError::Unavailable("timeout".to_string()))
        });

        session.start_loading(source, StarFieldParams::default());
        wait_for_load(&mut session);

        assert!(session.field().is_empty());
        assert_eq!(session.status(Instant::now()), Some(UNAVAILABLE_STATUS));

        // Scene still renders the reference point
        let scene = session.scene(Instant::now());
        assert_eq!(scene.reference_name, "Pole b");
        assert!(scene.stars.is_empty());
    }

    #[test]
    fn test_click_selects_star_in_scene() {
        let mut session = Session::new(reference(), SessionConfig::default(), DISPLAY);
        let rows = vec![CatalogRow {
            source_id: 5,
            ra: Some(0.0),
            dec: Some(0.0),
            parallax: Some(1.0),
            phot_bp_mean_mag: Some(11.0),
            phot_rp_mean_mag: Some(10.2),
        }];
        session.set_field(StarField::from_rows(
            session.reference(),
            &rows,
            &StarFieldParams::default(),
        ));

        // (1, 0, 0) projects to (475, 300)
        session.handle_event(InputEvent::MouseLeft { x: 475.0, y: 300.0 });
        let scene = session.scene(Instant::now());
        assert_eq!(scene.selected.map(Star::id), Some(StarId(5)));
    }

    #[test]
    fn test_snapshot_status_expires() {
        let dir = tempdir().unwrap();
        let config = SessionConfig {
            snapshot_path: dir.path().join("frame.png"),
            status_duration: Duration::from_secs(2),
            ..Default::default()
        };
        let mut session = Session::new(reference(), config, DISPLAY);
        let frame = Pixmap::new(16, 16).unwrap();

        assert_eq!(
            session.handle_event(InputEvent::Key(Key::Snapshot)),
            Outcome::SaveSnapshot
        );
        let now = Instant::now();
        session.save_snapshot(&frame, now);

        assert!(dir.path().join("frame.png").exists());
        assert!(session
            .status(now + Duration::from_secs(1))
            .is_some_and(|s| s.starts_with("Screenshot saved")));
        assert_eq!(session.status(now + Duration::from_secs(3)), None);
    }

    #[test]
    fn test_unavailable_status_returns_after_snapshot_notice() {
        let dir = tempdir().unwrap();
        let config = SessionConfig {
            snapshot_path: dir.path().join("frame.png"),
            status_duration: Duration::from_secs(3),
            ..Default::default()
        };
        let mut session = Session::new(reference(), config, DISPLAY);
        let source = Arc::new(|_: SkyPoint, _: f64| -> Rows {
            Err(FetchError::Unavailable("offline".to_string()))
        });
        session.start_loading(source, StarFieldParams::default());
        wait_for_load(&mut session);

        let now = Instant::now();
        session.save_snapshot(&Pixmap::new(8, 8).unwrap(), now);
        assert!(session
            .status(now + Duration::from_secs(1))
            .is_some_and(|s| s.starts_with("Screenshot saved")));
        assert_eq!(
            session.status(now + Duration::from_secs(4)),
            Some(UNAVAILABLE_STATUS)
        );
    }

    #[test]
    fn test_snapshot_failure_keeps_running() {
        let dir = tempdir().unwrap();
        let config = SessionConfig {
            snapshot_path: dir.path().join("no_such_dir").join("frame.png"),
            ..Default::default()
        };
        let mut session = Session::new(reference(), config, DISPLAY);
        let now = Instant::now();

        session.save_snapshot(&Pixmap::new(4, 4).unwrap(), now);
        assert!(session
            .status(now)
            .is_some_and(|s| s.starts_with("Screenshot failed")));
        assert_eq!(
            session.handle_event(InputEvent::Key(Key::ZoomIn)),
            Outcome::Continue
        );
    }

    #[test]
    fn test_fullscreen_uses_display() {
        let mut session = Session::new(reference(), SessionConfig::default(), DISPLAY);
        session.set_display(Viewport::new(2560, 1440));

        let outcome = session.handle_event(InputEvent::Key(Key::ToggleFullscreen));
        assert_eq!(
            outcome,
            Outcome::SurfaceChanged {
                fullscreen: true,
                viewport: Viewport::new(2560, 1440)
            }
        );
    }
}
