//! Photometry models and utilities

pub mod color;
pub mod spectrum;
pub mod trapezoid;

pub use color::{
    color_index_to_temperature, lighten, star_color, temperature_to_rgb,
    temperature_to_spectral_class, Rgb, SpectralClass, NEUTRAL_COLOR,
};
pub use spectrum::{planck_radiance, Band};
pub use trapezoid::trap_integrate;
