//! Star colours from photometric magnitudes.
//!
//! A star's display colour is derived in three steps:
//!
//! 1. **Color index → temperature.** The BP−RP color index is fed through the
//!    Ballesteros relation `T = 4600 (1/(0.92 i + 1.7) + 1/(0.92 i + 0.62))`.
//! 2. **Temperature → RGB.** Planck radiance is integrated over three visible
//!    sub-bands (blue 380–495 nm, green 495–570 nm, red 620–750 nm) with the
//!    trapezoid rule on a 1 nm grid, and the band sums are normalised to 255.
//! 3. **Lighten.** The renderer scales the colour up for the glow and core,
//!    desaturating toward white instead of clipping.
//!
//! Any step that cannot produce a meaningful result falls back to
//! [`NEUTRAL_COLOR`] rather than propagating NaN.
//!
//! # Examples
//!
//! ```rust
//! use skyview::photometry::color::{star_color, temperature_to_rgb, lighten, Rgb};
//!
//! // A cool, red star has more red than blue
//! let cool = temperature_to_rgb(3000.0);
//! assert!(cool.r > cool.b);
//!
//! // Unknown photometry gives the neutral fallback
//! let (color, temperature) = star_color(f64::NAN, 1.0);
//! assert_eq!(color, skyview::photometry::color::NEUTRAL_COLOR);
//! assert!(temperature.is_none());
//!
//! // Lightening by 1.0 is the identity
//! let c = Rgb::new(120, 80, 40);
//! assert_eq!(lighten(c, 1.0), c);
//! ```

use std::fmt;
use std::sync::OnceLock;

use super::spectrum::{planck_radiance, Band};
use super::trapezoid::trap_integrate;

/// An 8-bit RGB display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Largest of the three channels
    pub fn max_channel(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    /// Hex notation used in SVG overlays, e.g. `#ff8800`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Colour used whenever photometry cannot be turned into a temperature.
///
/// Equal channels summing to 255, the same normalisation as
/// [`temperature_to_rgb`], so it lightens like any other star.
pub const NEUTRAL_COLOR: Rgb = Rgb::new(85, 85, 85);

/// Color indices outside this range are clamped before the temperature fit.
///
/// The fit has poles at i ≈ −1.85 and i ≈ −0.67; the lower clamp keeps both
/// denominators ≥ 0.16.
pub const COLOR_INDEX_RANGE: (f64, f64) = (-0.5, 6.0);

/// Channel ceiling used by [`lighten`]
const DISPLAY_CEILING: f64 = 255.999;

/// Upper bound applied to lighten factors so channel products stay finite
const MAX_LIGHTEN_FACTOR: f64 = 1.0e6;

/// Number of wavelength samples across the visible range (1 nm spacing)
const SPECTRUM_SAMPLES: usize = 371;

pub const VISIBLE_BAND: Band = Band {
    lower_nm: 380.0,
    upper_nm: 750.0,
};
pub const BLUE_BAND: Band = Band {
    lower_nm: 380.0,
    upper_nm: 495.0,
};
pub const GREEN_BAND: Band = Band {
    lower_nm: 495.0,
    upper_nm: 570.0,
};
pub const RED_BAND: Band = Band {
    lower_nm: 620.0,
    upper_nm: 750.0,
};

/// The spectral classification system for stars, known as the Morgan-Keenan system.
///
/// The main classes from hottest to coolest are: O, B, A, F, G, K, M.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralClass {
    /// Above 30,000K, blue
    O,
    /// 10,000-30,000K, blue-white
    B,
    /// 7,500-10,000K, white
    A,
    /// 6,000-7,500K, yellow-white
    F,
    /// 5,200-6,000K, yellow
    G,
    /// 3,700-5,200K, orange
    K,
    /// Below 3,700K, red
    M,
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display as a single character
        write!(
            f,
            "{}",
            match self {
                SpectralClass::O => 'O',
                SpectralClass::B => 'B',
                SpectralClass::A => 'A',
                SpectralClass::F => 'F',
                SpectralClass::G => 'G',
                SpectralClass::K => 'K',
                SpectralClass::M => 'M',
            }
        )
    }
}

/// Determine Morgan-Keenan spectral class from stellar effective temperature.
///
/// # Arguments
/// * `temperature` - Stellar effective temperature in Kelvin
pub fn temperature_to_spectral_class(temperature: f64) -> SpectralClass {
    if temperature >= 30000.0 {
        SpectralClass::O
    } else if temperature >= 10000.0 {
        SpectralClass::B
    } else if temperature >= 7500.0 {
        SpectralClass::A
    } else if temperature >= 6000.0 {
        SpectralClass::F
    } else if temperature >= 5200.0 {
        SpectralClass::G
    } else if temperature >= 3700.0 {
        SpectralClass::K
    } else {
        SpectralClass::M
    }
}

/// Estimate effective temperature from blue and red band magnitudes.
///
/// # Arguments
/// * `bp_mag` - Blue-band magnitude (Gaia BP)
/// * `rp_mag` - Red-band magnitude (Gaia RP)
///
/// # Returns
/// Temperature in Kelvin, or `None` when the inputs are not finite ("colour
/// unknown"). The color index is clamped to [`COLOR_INDEX_RANGE`].
pub fn color_index_to_temperature(bp_mag: f64, rp_mag: f64) -> Option<f64> {
    let index = bp_mag - rp_mag;
    if !index.is_finite() {
        return None;
    }

    let index = index.clamp(COLOR_INDEX_RANGE.0, COLOR_INDEX_RANGE.1);
    let temperature = 4600.0 * (1.0 / (0.92 * index + 1.7) + 1.0 / (0.92 * index + 0.62));

    (temperature.is_finite() && temperature > 0.0).then_some(temperature)
}

fn spectrum_grid() -> &'static [f64] {
    static GRID: OnceLock<Vec<f64>> = OnceLock::new();
    GRID.get_or_init(|| VISIBLE_BAND.sample_grid(SPECTRUM_SAMPLES))
}

fn band_radiance(band: &Band, temperature_k: f64) -> f64 {
    let corners = band.corners_in(spectrum_grid());
    match trap_integrate(&corners, |nm| planck_radiance(nm, temperature_k)) {
        Ok(total) => total,
        Err(e) => {
            log::warn!(
                "Band {}-{} nm could not be integrated: {e}",
                band.lower_nm,
                band.upper_nm
            );
            0.0
        }
    }
}

/// Convert a blackbody temperature to an apparent display colour.
///
/// The three band integrals are scaled so they sum to 255 and rounded, so
/// the result encodes hue rather than brightness.
///
/// # Arguments
/// * `kelvin` - Blackbody temperature
///
/// # Returns
/// RGB channels in [0, 255]; [`NEUTRAL_COLOR`] for non-positive or
/// non-finite temperatures and whenever the integrated radiance is zero.
pub fn temperature_to_rgb(kelvin: f64) -> Rgb {
    if !(kelvin.is_finite() && kelvin > 0.0) {
        return NEUTRAL_COLOR;
    }

    let red = band_radiance(&RED_BAND, kelvin);
    let green = band_radiance(&GREEN_BAND, kelvin);
    let blue = band_radiance(&BLUE_BAND, kelvin);

    let total = red + green + blue;
    if !(total.is_finite() && total > 0.0) {
        return NEUTRAL_COLOR;
    }

    let scale = 255.0 / total;
    let channel = |value: f64| (value * scale).round().clamp(0.0, 255.0) as u8;

    Rgb::new(channel(red), channel(green), channel(blue))
}

/// Colour and temperature for a star from its BP/RP magnitudes.
///
/// Unknown photometry maps to [`NEUTRAL_COLOR`] with no temperature.
pub fn star_color(bp_mag: f64, rp_mag: f64) -> (Rgb, Option<f64>) {
    match color_index_to_temperature(bp_mag, rp_mag) {
        Some(temperature) => (temperature_to_rgb(temperature), Some(temperature)),
        None => (NEUTRAL_COLOR, None),
    }
}

/// Scale a colour by `factor` without clipping.
///
/// When the brightest scaled channel would exceed the display ceiling, the
/// colour is blended toward white just enough to fit: the channel ordering
/// (hue) is preserved and saturation gives way instead.
///
/// NaN and negative factors act as 0; huge factors saturate to white.
pub fn lighten(color: Rgb, factor: f64) -> Rgb {
    let factor = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, MAX_LIGHTEN_FACTOR)
    };

    let r = color.r as f64 * factor;
    let g = color.g as f64 * factor;
    let b = color.b as f64 * factor;

    let max = r.max(g).max(b);
    if max <= DISPLAY_CEILING {
        return Rgb::new(r as u8, g as u8, b as u8);
    }

    let total = r + g + b;
    if total >= 3.0 * DISPLAY_CEILING {
        return Rgb::WHITE;
    }

    // Mix with grey so the max channel lands exactly on the ceiling while the
    // channel sum is preserved.
    let x = (3.0 * DISPLAY_CEILING - total) / (3.0 * max - total);
    let gray = DISPLAY_CEILING - x * max;
    let channel = |value: f64| (gray + x * value).clamp(0.0, 255.0) as u8;

    Rgb::new(channel(r), channel(g), channel(b))
}
