//! Glue between the CLI, the archives and a viewing session.

use std::sync::Arc;

use anyhow::{Context, Result};
use catalogs::{ArchiveError, CsvCatalog, ExoplanetArchive, GaiaClient, PlanetDetails};
use log::info;
use skyview::{CatalogSource, ReferencePoint, SkyPoint};

use crate::cli::ViewArgs;
use crate::config::ViewerConfig;

pub fn archive(config: &ViewerConfig) -> ExoplanetArchive {
    ExoplanetArchive::new(config.exoplanet_archive_url.clone(), config.http_timeout())
}

/// The view's reference point: explicit coordinates if both were given,
/// otherwise the archive position looked up with `lookup`.
pub fn resolve_reference<F>(args: &ViewArgs, lookup: F) -> Result<ReferencePoint>
where
    F: FnOnce(&str) -> Result<PlanetDetails, ArchiveError>,
{
    if let (Some(ra), Some(dec)) = (args.ra, args.dec) {
        let position = SkyPoint::new(ra, dec).context("Invalid --ra/--dec")?;
        return Ok(ReferencePoint::new(args.name.clone(), position));
    }

    let details = lookup(&args.name)
        .with_context(|| format!("Failed to look up '{}' in the archive", args.name))?;
    let reference = details.reference_point()?;
    info!("{} is at {}", reference.name, reference.position);
    Ok(reference)
}

/// Where the session's stars come from: a CSV file or the Gaia archive.
pub fn star_source(args: &ViewArgs, config: &ViewerConfig) -> Result<Arc<dyn CatalogSource>> {
    match &args.stars {
        Some(path) => {
            let catalog = CsvCatalog::from_path(path)
                .with_context(|| format!("Failed to load stars from {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => Ok(Arc::new(GaiaClient::new(
            config.gaia_url.clone(),
            config.http_timeout(),
            config.gaia_row_limit,
        ))),
    }
}
