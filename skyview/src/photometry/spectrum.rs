//! Blackbody spectrum model used for star colouring
//!
//! Radiance follows Planck's law in CGS units. Only relative values matter for
//! display colours, but the constants are kept physical so the curves can be
//! checked against known results (Wien's displacement law).

/// Physical constants in CGS units
pub struct CGS {}

impl CGS {
    /// erg s
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-27;
    /// cm/s
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;
    /// erg/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-16;
}

/// Closed wavelength interval in nanometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower_nm: f64,
    pub upper_nm: f64,
}

impl Band {
    /// Panics on reversed, negative or non-finite bounds; bands are fixed
    /// constants, never user input.
    pub fn from_nm_bounds(lower_nm: f64, upper_nm: f64) -> Self {
        assert!(
            lower_nm.is_finite() && upper_nm.is_finite(),
            "Band bounds must be finite"
        );
        assert!(
            lower_nm <= upper_nm,
            "Invalid wavelength range {lower_nm}..{upper_nm}"
        );
        assert!(lower_nm >= 0.0, "Wavelengths must be non-negative");

        Self { lower_nm, upper_nm }
    }

    pub fn width(&self) -> f64 {
        self.upper_nm - self.lower_nm
    }

    /// Midpoint in nanometers
    pub fn center(&self) -> f64 {
        (self.lower_nm + self.upper_nm) / 2.0
    }

    /// Whether a wavelength lies inside the band (bounds inclusive)
    pub fn contains(&self, wavelength_nm: f64) -> bool {
        (self.lower_nm..=self.upper_nm).contains(&wavelength_nm)
    }

    /// Uniformly spaced sample wavelengths covering the band, both ends included.
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of sample points, at least 2
    pub fn sample_grid(&self, samples: usize) -> Vec<f64> {
        let samples = samples.max(2);
        let step = self.width() / (samples - 1) as f64;
        (0..samples)
            .map(|i| {
                if i == samples - 1 {
                    self.upper_nm
                } else {
                    self.lower_nm + i as f64 * step
                }
            })
            .collect()
    }

    /// Points of `grid` that fall inside this band, in ascending order.
    pub fn corners_in(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().copied().filter(|&nm| self.contains(nm)).collect()
    }
}

/// Blackbody spectral radiance from Planck's law.
///
/// B(λ, T) = 2hc² / λ⁵ / (exp(hc / λkT) − 1)
///
/// # Arguments
/// * `wavelength_nm` - Wavelength in nanometers
/// * `temperature_k` - Blackbody temperature in Kelvin
///
/// # Returns
/// Spectral radiance in erg s⁻¹ cm⁻² sr⁻¹ cm⁻¹. Returns 0.0 for non-positive
/// or non-finite inputs, and when the exponential overflows (very cold bodies).
pub fn planck_radiance(wavelength_nm: f64, temperature_k: f64) -> f64 {
    if !(wavelength_nm > 0.0 && temperature_k > 0.0)
        || !wavelength_nm.is_finite()
        || !temperature_k.is_finite()
    {
        return 0.0;
    }

    let wavelength_cm = wavelength_nm * 1e-7;
    let h = CGS::PLANCK_CONSTANT;
    let c = CGS::SPEED_OF_LIGHT;
    let k = CGS::BOLTZMANN_CONSTANT;

    let exponent = h * c / (wavelength_cm * k * temperature_k);
    let denominator = exponent.exp_m1();
    if !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }

    2.0 * h * c * c / wavelength_cm.powi(5) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_geometry() {
        let band = Band::from_nm_bounds(400.0, 700.0);
        assert_relative_eq!(band.width(), 300.0);
        assert_relative_eq!(band.center(), 550.0);
        assert!(band.contains(400.0));
        assert!(band.contains(700.0));
        assert!(!band.contains(700.5));
    }

    #[test]
    #[should_panic(expected = "Invalid wavelength range")]
    fn test_band_reversed_panics() {
        Band::from_nm_bounds(700.0, 400.0);
    }

    #[test]
    fn test_sample_grid() {
        let band = Band::from_nm_bounds(380.0, 750.0);
        let grid = band.sample_grid(371);

        assert_eq!(grid.len(), 371);
        assert_eq!(grid[0], 380.0);
        assert_eq!(*grid.last().unwrap(), 750.0);
        assert_relative_eq!(grid[1] - grid[0], 1.0, epsilon = 1e-9);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_corners_in() {
        let grid = Band::from_nm_bounds(380.0, 750.0).sample_grid(371);
        let green = Band::from_nm_bounds(495.0, 570.0).corners_in(&grid);

        assert_eq!(green.len(), 76);
        assert_relative_eq!(green[0], 495.0, epsilon = 1e-9);
        assert_relative_eq!(*green.last().unwrap(), 570.0, epsilon = 1e-9);
    }

    #[test]
    fn test_planck_wien_peak() {
        // Wien: λ_max = 2.897771955e6 nm·K / T, ~502 nm at 5772 K
        let temperature = 5772.0;
        let expected_peak = 2.897771955e6 / temperature;

        let peak = (300..=900)
            .map(|nm| nm as f64)
            .max_by(|a, b| {
                planck_radiance(*a, temperature).total_cmp(&planck_radiance(*b, temperature))
            })
            .unwrap();

        assert!(
            (peak - expected_peak).abs() <= 1.0,
            "peak {peak} vs {expected_peak}"
        );
    }

    #[test]
    fn test_planck_hotter_is_brighter() {
        for nm in [400.0, 550.0, 700.0] {
            assert!(planck_radiance(nm, 10000.0) > planck_radiance(nm, 5000.0));
        }
    }

    #[test]
    fn test_planck_degenerate_inputs() {
        assert_eq!(planck_radiance(500.0, 0.0), 0.0);
        assert_eq!(planck_radiance(500.0, -100.0), 0.0);
        assert_eq!(planck_radiance(500.0, f64::NAN), 0.0);
        assert_eq!(planck_radiance(0.0, 5000.0), 0.0);
        // exp overflows for a 1 K body at visible wavelengths
        assert_eq!(planck_radiance(500.0, 1.0), 0.0);
    }
}
