//! PNG snapshots of the last rendered frame.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::render::frame_to_image;

/// Default snapshot file name, relative to the working directory
pub const DEFAULT_SNAPSHOT_PATH: &str = "screenshot.png";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Frame buffer of {width}x{height} could not be converted")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Save `frame` to `path` as PNG.
pub fn save_png(frame: &Pixmap, path: &Path) -> Result<(), SnapshotError> {
    let image = frame_to_image(frame).ok_or(SnapshotError::InvalidFrame {
        width: frame.width(),
        height: frame.height(),
    })?;

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Saved {}x{} snapshot to {}", frame.width(), frame.height(), path.display());
    Ok(())
}

/// Save a snapshot and produce the on-screen status message for the result.
pub fn save_with_status(frame: &Pixmap, path: &Path) -> String {
    match save_png(frame, path) {
        Ok(()) => format!("Screenshot saved as {}", path.display()),
        Err(e) => {
            warn!("{e}");
            format!("Screenshot failed: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tiny_skia::Color;

    fn frame() -> Pixmap {
        let mut pixmap = Pixmap::new(8, 4).unwrap();
        pixmap.fill(Color::from_rgba8(200, 100, 50, 255));
        pixmap
    }

    #[test]
    fn test_save_png_round_trips_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shot.png");

        save_png(&frame(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(loaded.get_pixel(3, 2).0, [200, 100, 50]);
    }

    #[test]
    fn test_status_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shot.png");

        let status = save_with_status(&frame(), &path);
        assert!(status.starts_with("Screenshot saved as"));
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_reports_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("shot.png");

        assert!(matches!(
            save_png(&frame(), &path),
            Err(SnapshotError::Write { .. })
        ));
        assert!(save_with_status(&frame(), &path).starts_with("Screenshot failed"));
    }
}
