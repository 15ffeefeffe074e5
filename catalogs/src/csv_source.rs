//! Offline star catalog from a CSV export.
//!
//! The file uses the Gaia column names (`source_id`, `ra`, `dec`, `parallax`,
//! `phot_bp_mean_mag`, `phot_rp_mean_mag`, case-insensitive). Extra columns
//! are ignored and empty cells are missing values.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use log::info;
use skyview::coordinates::great_circle_separation;
use skyview::{CatalogRow, CatalogSource, FetchError, SkyPoint};

use crate::error::ArchiveError;

/// Catalog rows loaded from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvCatalog {
    rows: Vec<CatalogRow>,
}

impl CsvCatalog {
    pub fn from_path(path: &Path) -> Result<Self, ArchiveError> {
        let file = std::fs::File::open(path).map_err(|e| ArchiveError::Csv {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let catalog = Self::read(file, path)?;
        info!("Loaded {} rows from {}", catalog.rows.len(), path.display());
        Ok(catalog)
    }

    /// Parse CSV from any reader. `origin` only labels errors.
    pub fn read<R: Read>(reader: R, origin: &Path) -> Result<Self, ArchiveError> {
        let csv_error = |source: csv::Error| ArchiveError::Csv {
            path: PathBuf::from(origin),
            source,
        };

        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers: StringRecord = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_ascii_lowercase)
            .collect();
        reader.set_headers(headers);

        let rows = reader
            .deserialize()
            .collect::<Result<Vec<CatalogRow>, _>>()
            .map_err(csv_error)?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }
}

impl CatalogSource for CsvCatalog {
    /// Rows within `radius_deg` of `center` on the sky.
    ///
    /// Rows without a position are passed through; the star field drops them.
    fn fetch(&self, center: SkyPoint, radius_deg: f64) -> Result<Vec<CatalogRow>, FetchError> {
        let within = |row: &&CatalogRow| match (row.ra, row.dec) {
            (Some(ra), Some(dec)) => SkyPoint::new(ra, dec)
                .map(|p| great_circle_separation(&center, &p) <= radius_deg)
                .unwrap_or(true),
            _ => true,
        };
        Ok(self.rows.iter().filter(within).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
SOURCE_ID,ra,dec,parallax,phot_bp_mean_mag,phot_rp_mean_mag,phot_g_mean_mag
101,10.0,20.0,1.5,12.1,11.2,11.7
102,10.5,20.2,,13.0,12.4,12.8
103,40.0,-5.0,0.8,9.9,9.1,9.5
";

    #[test]
    fn test_read_with_missing_cells() {
        let catalog = CsvCatalog::read(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();
        let rows = catalog.rows();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].source_id, 101);
        assert_relative_eq!(rows[0].parallax.unwrap(), 1.5);
        assert_eq!(rows[1].parallax, None);
        assert_relative_eq!(rows[2].phot_rp_mean_mag.unwrap(), 9.1);
    }

    #[test]
    fn test_fetch_filters_by_cone() {
        let catalog = CsvCatalog::read(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();
        let rows = catalog.fetch(SkyPoint::new(10.0, 20.0).unwrap(), 1.0).unwrap();

        let ids: Vec<u64> = rows.iter().map(|r| r.source_id).collect();
        assert_eq!(ids, vec![101, 102]);
    }

    #[test]
    fn test_cone_wraps_ra_and_converges_at_pole() {
        let csv = "\
source_id,ra,dec,parallax,phot_bp_mean_mag,phot_rp_mean_mag
1,359.9,10.0,1.0,12.0,11.0
2,150.0,89.8,1.0,12.0,11.0
3,3.0,10.0,1.0,12.0,11.0
";
        let catalog = CsvCatalog::read(csv.as_bytes(), Path::new("edges.csv")).unwrap();

        let seam = catalog.fetch(SkyPoint::new(0.2, 10.0).unwrap(), 1.0).unwrap();
        let ids: Vec<u64> = seam.iter().map(|r| r.source_id).collect();
        assert_eq!(ids, vec![1]);

        let pole = catalog.fetch(SkyPoint::new(0.0, 89.8).unwrap(), 1.0).unwrap();
        let ids: Vec<u64> = pole.iter().map(|r| r.source_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = CsvCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.rows().len(), 3);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let err = CsvCatalog::from_path(Path::new("/nonexistent/stars.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stars.csv"));

        let bad = "source_id,ra\nnot-a-number,1.0\n";
        assert!(CsvCatalog::read(bad.as_bytes(), Path::new("bad.csv")).is_err());
    }
}
