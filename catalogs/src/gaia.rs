//! Gaia DR3 cone search through the ESA TAP service.
//!
//! Queries go to the synchronous TAP endpoint with `FORMAT=json`, which
//! answers with column metadata plus positional rows:
//!
//! ```json
//! {"metadata": [{"name": "source_id"}, {"name": "ra"}, ...],
//!  "data": [[4295806720, 44.99, ...], ...]}
//! ```

use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use skyview::{CatalogRow, CatalogSource, FetchError, SkyPoint};
use ureq::Agent;

use crate::error::ArchiveError;
use crate::http::{agent, tap_query};

pub const GAIA_TAP_URL: &str = "https://gea.esac.esa.int/tap-server/tap/sync";

/// Default cap on rows per cone query
pub const DEFAULT_ROW_LIMIT: u32 = 2000;

const COLUMNS: [&str; 6] = [
    "source_id",
    "ra",
    "dec",
    "parallax",
    "phot_bp_mean_mag",
    "phot_rp_mean_mag",
];

#[derive(Debug, Deserialize)]
struct Column {
    name: String,
}

/// Raw TAP JSON table
#[derive(Debug, Deserialize)]
pub struct TapTable {
    metadata: Vec<Column>,
    data: Vec<Vec<Value>>,
}

/// ADQL for a cone of `radius_deg` around `center`.
pub fn cone_query(center: SkyPoint, radius_deg: f64, max_rows: u32) -> String {
    format!(
        "SELECT TOP {max_rows} {} FROM gaiadr3.gaia_source \
         WHERE 1 = CONTAINS(POINT('ICRS', ra, dec), CIRCLE('ICRS', {:.8}, {:.8}, {:.8})) \
         AND parallax IS NOT NULL",
        COLUMNS.join(", "),
        center.ra(),
        center.dec(),
        radius_deg
    )
}

fn column_index(table: &TapTable, name: &str) -> Option<usize> {
    table
        .metadata
        .iter()
        .position(|column| column.name.eq_ignore_ascii_case(name))
}

fn source_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert a TAP table into catalog rows.
///
/// Columns are located by name. A missing `source_id` column is an error;
/// any other missing column or null cell becomes `None` on the row. Rows
/// without a usable id are skipped.
pub fn rows_from_table(table: &TapTable) -> Result<Vec<CatalogRow>, String> {
    let id_index = column_index(table, "source_id")
        .ok_or_else(|| "response has no source_id column".to_string())?;
    let index = |name: &str| column_index(table, name);
    let (ra, dec, parallax, bp, rp) = (
        index("ra"),
        index("dec"),
        index("parallax"),
        index("phot_bp_mean_mag"),
        index("phot_rp_mean_mag"),
    );

    let mut skipped = 0usize;
    let rows: Vec<CatalogRow> = table
        .data
        .iter()
        .filter_map(|cells| {
            let number = |i: Option<usize>| i.and_then(|i| cells.get(i)).and_then(Value::as_f64);
            let Some(id) = cells.get(id_index).and_then(source_id) else {
                skipped += 1;
                return None;
            };
            Some(CatalogRow {
                source_id: id,
                ra: number(ra),
                dec: number(dec),
                parallax: number(parallax),
                phot_bp_mean_mag: number(bp),
                phot_rp_mean_mag: number(rp),
            })
        })
        .collect();

    if skipped > 0 {
        debug!("Skipped {skipped} Gaia rows without a source_id");
    }
    Ok(rows)
}

/// Parse a TAP JSON body into catalog rows
pub fn parse_tap_json(body: &str) -> Result<Vec<CatalogRow>, String> {
    let table: TapTable = serde_json::from_str(body).map_err(|e| e.to_string())?;
    rows_from_table(&table)
}

/// Blocking Gaia cone-search client.
pub struct GaiaClient {
    agent: Agent,
    url: String,
    max_rows: u32,
}

impl GaiaClient {
    pub fn new(url: impl Into<String>, timeout: Duration, max_rows: u32) -> Self {
        Self {
            agent: agent(timeout),
            url: url.into(),
            max_rows,
        }
    }

    /// Fetch every row in the cone around `center`.
    pub fn cone_search(
        &self,
        center: SkyPoint,
        radius_deg: f64,
    ) -> Result<Vec<CatalogRow>, ArchiveError> {
        let adql = cone_query(center, radius_deg, self.max_rows);
        let table: TapTable = tap_query(
            &self.agent,
            &self.url,
            &[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", "json"),
                ("QUERY", adql.as_str()),
            ],
        )?;

        let rows = rows_from_table(&table).map_err(|e| ArchiveError::invalid(&self.url, e))?;
        info!("Gaia returned {} rows within {radius_deg}° of {center}", rows.len());
        Ok(rows)
    }
}

impl Default for GaiaClient {
    fn default() -> Self {
        Self::new(GAIA_TAP_URL, Duration::from_secs(60), DEFAULT_ROW_LIMIT)
    }
}

impl CatalogSource for GaiaClient {
    fn fetch(&self, center: SkyPoint, radius_deg: f64) -> Result<Vec<CatalogRow>, FetchError> {
        Ok(self.cone_search(center, radius_deg)?)
    }
}
