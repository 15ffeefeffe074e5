//! Data sources for the star-field viewer.
//!
//! - [`gaia`]: Gaia DR3 cone search, the live [`skyview::CatalogSource`]
//! - [`exoplanet_archive`]: planet names and parameters from `pscomppars`
//! - [`csv_source`]: offline star rows from a CSV export
//! - [`planets`]: planet name search
//!
//! All network calls are blocking, one request per call, without retries.

pub mod csv_source;
pub mod error;
pub mod exoplanet_archive;
pub mod gaia;
pub mod http;
pub mod planets;

pub use csv_source::CsvCatalog;
pub use error::ArchiveError;
pub use exoplanet_archive::{ExoplanetArchive, PlanetDetails};
pub use gaia::GaiaClient;
pub use planets::search_planets;
