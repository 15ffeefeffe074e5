//! NASA Exoplanet Archive lookups on the `pscomppars` table.

use std::fmt;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use skyview::{ReferencePoint, SkyPoint};
use ureq::Agent;

use crate::error::ArchiveError;
use crate::http::{adql_string, agent, tap_query};

pub const EXOPLANET_ARCHIVE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

const DETAIL_COLUMNS: &str =
    "pl_name, pl_orbper, pl_rade, pl_bmasse, pl_dens, pl_eqt, sy_dist, st_rad, st_mass, ra, dec";

#[derive(Debug, Deserialize)]
struct NameRow {
    pl_name: Option<String>,
}

/// Composite parameters for one planet. Any value may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetDetails {
    #[serde(rename = "pl_name")]
    pub name: String,
    /// Orbital period in days
    #[serde(rename = "pl_orbper")]
    pub orbital_period_days: Option<f64>,
    /// Radius in Earth radii
    #[serde(rename = "pl_rade")]
    pub radius_earth: Option<f64>,
    /// Mass in Earth masses
    #[serde(rename = "pl_bmasse")]
    pub mass_earth: Option<f64>,
    /// Density in g/cm³
    #[serde(rename = "pl_dens")]
    pub density: Option<f64>,
    /// Equilibrium temperature in Kelvin
    #[serde(rename = "pl_eqt")]
    pub equilibrium_temperature_k: Option<f64>,
    /// Distance of the system in parsecs
    #[serde(rename = "sy_dist")]
    pub distance_pc: Option<f64>,
    /// Host star radius in solar radii
    #[serde(rename = "st_rad")]
    pub star_radius_solar: Option<f64>,
    /// Host star mass in solar masses
    #[serde(rename = "st_mass")]
    pub star_mass_solar: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
}

impl PlanetDetails {
    /// Sky position, if the archive has a valid one
    pub fn sky_point(&self) -> Result<SkyPoint, ArchiveError> {
        let missing = || ArchiveError::MissingPosition {
            name: self.name.clone(),
        };
        let (ra, dec) = self.ra.zip(self.dec).ok_or_else(missing)?;
        SkyPoint::new(ra, dec).map_err(|_| missing())
    }

    /// The planet as the centre of a star-field view
    pub fn reference_point(&self) -> Result<ReferencePoint, ArchiveError> {
        Ok(ReferencePoint::new(self.name.clone(), self.sky_point()?))
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, label: &str, value: Option<f64>, unit: &str) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "  {label}: {v} {unit}"),
        None => writeln!(f, "  {label}: unknown"),
    }
}

impl fmt::Display for PlanetDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        write_value(f, "Orbital period", self.orbital_period_days, "days")?;
        write_value(f, "Radius", self.radius_earth, "Earth radii")?;
        write_value(f, "Mass", self.mass_earth, "Earth masses")?;
        write_value(f, "Density", self.density, "g/cm^3")?;
        write_value(f, "Equilibrium temperature", self.equilibrium_temperature_k, "K")?;
        write_value(f, "Distance from Earth", self.distance_pc, "parsecs")?;
        write_value(f, "Host star radius", self.star_radius_solar, "solar radii")?;
        write_value(f, "Host star mass", self.star_mass_solar, "solar masses")?;
        write_value(f, "RA", self.ra, "deg")?;
        write_value(f, "Dec", self.dec, "deg")
    }
}

/// ADQL for the full planet name list
pub fn names_query() -> String {
    "SELECT pl_name FROM pscomppars".to_string()
}

/// ADQL for one planet's composite parameters
pub fn details_query(name: &str) -> String {
    format!(
        "SELECT {DETAIL_COLUMNS} FROM pscomppars WHERE pl_name = {}",
        adql_string(name)
    )
}

/// Planet names from name-list rows, nulls dropped
fn names_from_rows(rows: Vec<NameRow>) -> Vec<String> {
    rows.into_iter().filter_map(|row| row.pl_name).collect()
}

/// Blocking client for the archive's TAP endpoint.
pub struct ExoplanetArchive {
    agent: Agent,
    url: String,
}

impl ExoplanetArchive {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: agent(timeout),
            url: url.into(),
        }
    }

    fn query<T: serde::de::DeserializeOwned>(&self, adql: &str) -> Result<T, ArchiveError> {
        tap_query(&self.agent, &self.url, &[("query", adql), ("format", "json")])
    }

    /// Every planet name in the composite table, in archive order.
    pub fn planet_names(&self) -> Result<Vec<String>, ArchiveError> {
        let rows: Vec<NameRow> = self.query(&names_query())?;
        let names = names_from_rows(rows);
        info!("Retrieved {} planets from pscomppars", names.len());
        Ok(names)
    }

    /// Composite parameters for the planet called `name`.
    pub fn planet_details(&self, name: &str) -> Result<PlanetDetails, ArchiveError> {
        let rows: Vec<PlanetDetails> = self.query(&details_query(name))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ArchiveError::PlanetNotFound(name.to_string()))
    }
}

impl Default for ExoplanetArchive {
    fn default() -> Self {
        Self::new(EXOPLANET_ARCHIVE_URL, Duration::from_secs(60))
    }
}
