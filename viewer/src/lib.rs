//! Command-line front end for the star-field viewer.
//!
//! The `exosky` binary searches the NASA Exoplanet Archive, prints planet
//! parameters and opens an SDL2 window on the stars around a chosen planet.
//! The window needs the `sdl2` feature; everything else builds without it.

pub mod app;
pub mod cli;
pub mod config;
#[cfg(feature = "sdl2")]
pub mod window;
