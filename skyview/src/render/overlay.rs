//! SVG overlay: help text, reference marker and labels.
//!
//! The overlay is rebuilt as an SVG document every frame and rasterised with
//! resvg on top of the star layer.

use std::borrow::Cow;
use std::fmt::Write;

use crate::photometry::{temperature_to_spectral_class, Rgb};
use crate::projection::Viewport;
use crate::star_field::Star;

pub const HELP_TEXT: &str = "Click on a star for more info! Pan around the exoplanet with arrow keys, and zoom out with +/-! Take a screenshot with F2!";

/// Radius of the white reference marker in pixels
pub const MARKER_RADIUS: f64 = 25.0;

const SELECTION_COLOR: Rgb = Rgb::new(255, 64, 64);
const HELP_COLOR: Rgb = Rgb::new(200, 200, 200);
const STATUS_COLOR: Rgb = Rgb::new(255, 220, 120);

/// Escape text for inclusion in SVG character data or attributes
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Label for the selected star, with temperature and class when known
pub fn selection_label(star: &Star) -> String {
    match star.temperature() {
        Some(temperature) => format!(
            "Star {} ({:.0} K, class {})",
            star.id(),
            temperature,
            temperature_to_spectral_class(temperature)
        ),
        None => format!("Star {}", star.id()),
    }
}

fn push_text(svg: &mut String, x: f64, y: f64, size: u32, color: Rgb, anchor: &str, text: &str) {
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"  <text x="{x:.1}" y="{y:.1}" font-size="{size}" fill="{}" text-anchor="{anchor}">{}</text>"#,
        color.to_hex(),
        escape_xml(text)
    );
}

/// Build the overlay document for one frame.
///
/// Drawn in order: help text, reference marker, reference name, selected
/// star label, status line.
pub fn overlay_svg(
    viewport: Viewport,
    reference_name: &str,
    selected: Option<&Star>,
    status: Option<&str>,
) -> String {
    let (width, height) = (viewport.width as f64, viewport.height as f64);
    let centre = viewport.center();

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = viewport.width,
        h = viewport.height
    );
    svg.push('\n');

    push_text(&mut svg, 10.0, height - 12.0, 14, HELP_COLOR, "start", HELP_TEXT);

    let _ = writeln!(
        svg,
        r#"  <circle cx="{:.1}" cy="{:.1}" r="{MARKER_RADIUS}" fill="white"/>"#,
        centre.x, centre.y
    );

    push_text(
        &mut svg,
        centre.x,
        centre.y + MARKER_RADIUS + 22.0,
        20,
        Rgb::WHITE,
        "middle",
        reference_name,
    );

    if let Some(star) = selected {
        push_text(
            &mut svg,
            10.0,
            36.0,
            28,
            SELECTION_COLOR,
            "start",
            &selection_label(star),
        );
    }

    if let Some(status) = status {
        push_text(
            &mut svg,
            width - 10.0,
            height - 12.0 - 24.0,
            16,
            STATUS_COLOR,
            "end",
            status,
        );
    }

    svg.push_str("</svg>\n");
    svg
}
