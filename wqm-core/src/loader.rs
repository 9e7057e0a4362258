//! CSV loading for the three fixed input sources.
//!
//! Each loader reads one source fully into memory with no filtering. A
//! source that cannot be opened, lacks a schema column, or is not valid CSV
//! fails with a [`StartupError`].
//!
//! # CSV Formats
//!
//! - **Sites**: `Site_ID,Site_Name,Town,Latitude_DD,Longitude_DD,Site_Description`
//! - **Results**: `Date_Collected,Time_Collected,Site_ID,QAQC_Status,Reporting_Result,Analytical_Method_ID`
//! - **Methods**: `Analytical_Method_ID,Parameter`
//!
//! Additional columns are ignored and column order does not matter.

use crate::error::{Result, StartupError};
use crate::method::{MethodRecord, MethodTable, METHOD_COLUMNS};
use crate::raw_result::{RawResult, RawResultTable, RESULT_COLUMNS};
use crate::site::{SiteRecord, SiteTable, SITE_COLUMNS};
use csv::{ReaderBuilder, Trim};
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const SITES_SOURCE: &str = "sites";
pub const RESULTS_SOURCE: &str = "results";
pub const METHODS_SOURCE: &str = "methods";

/// Default file names inside a data directory.
pub const SITES_FILE: &str = "Monitoring_Sites.csv";
pub const RESULTS_FILE: &str = "Results.csv";
pub const METHODS_FILE: &str = "Analytical_Methods.csv";

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "test_data";

/// Locations of the three input sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub sites: PathBuf,
    pub results: PathBuf,
    pub methods: PathBuf,
}

impl SourcePaths {
    /// Use the default file names inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            sites: dir.join(SITES_FILE),
            results: dir.join(RESULTS_FILE),
            methods: dir.join(METHODS_FILE),
        }
    }
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self::from_dir(DEFAULT_DATA_DIR)
    }
}

fn open_source(source_name: &'static str, path: &Path) -> Result<File> {
    File::open(path).map_err(|source| StartupError::SourceMissing {
        source_name,
        path: path.to_path_buf(),
        source,
    })
}

/// Read every row of a CSV source, after checking its header carries all of `columns`.
fn read_table<T, R>(reader: R, source_name: &'static str, columns: &[&'static str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_error = |source| StartupError::Csv { source_name, source };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    if let Some(column) = columns
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(StartupError::MissingColumn {
            source_name,
            column,
        });
    }

    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_error)?;
    info!("loader: Loaded {} {} rows", rows.len(), source_name);
    Ok(rows)
}

/// Parse the sites source from any reader.
pub fn read_sites<R: Read>(reader: R) -> Result<SiteTable> {
    read_table::<SiteRecord, _>(reader, SITES_SOURCE, &SITE_COLUMNS).map(SiteTable::new)
}

/// Parse the methods source from any reader.
pub fn read_methods<R: Read>(reader: R) -> Result<MethodTable> {
    read_table::<MethodRecord, _>(reader, METHODS_SOURCE, &METHOD_COLUMNS).map(MethodTable::new)
}

/// Parse the results source from any reader.
pub fn read_raw_results<R: Read>(reader: R) -> Result<RawResultTable> {
    read_table::<RawResult, _>(reader, RESULTS_SOURCE, &RESULT_COLUMNS).map(RawResultTable::new)
}

pub fn load_sites(path: impl AsRef<Path>) -> Result<SiteTable> {
    read_sites(open_source(SITES_SOURCE, path.as_ref())?)
}

pub fn load_methods(path: impl AsRef<Path>) -> Result<MethodTable> {
    read_methods(open_source(METHODS_SOURCE, path.as_ref())?)
}

pub fn load_raw_results(path: impl AsRef<Path>) -> Result<RawResultTable> {
    read_raw_results(open_source(RESULTS_SOURCE, path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITES_CSV: &str = include_str!("../../fixtures/Monitoring_Sites.csv");
    const RESULTS_CSV: &str = include_str!("../../fixtures/Results.csv");
    const METHODS_CSV: &str = include_str!("../../fixtures/Analytical_Methods.csv");

    #[test]
    fn test_read_fixture_sources() {
        let sites = read_sites(SITES_CSV.as_bytes()).unwrap();
        let methods = read_methods(METHODS_CSV.as_bytes()).unwrap();
        let results = read_raw_results(RESULTS_CSV.as_bytes()).unwrap();
        assert_eq!(sites.len(), 4);
        assert_eq!(methods.len(), 4);
        assert_eq!(results.len(), 14);
        assert_eq!(sites.records[0].site_id, "S1");
        assert_eq!(sites.records[0].latitude, Some(42.1));
    }

    #[test]
    fn test_blank_and_invalid_coordinates_load_as_none() {
        let csv = "Site_ID,Site_Name,Town,Latitude_DD,Longitude_DD,Site_Description\n\
                   S9,Nowhere,,,not-a-number,\n";
        let sites = read_sites(csv.as_bytes()).unwrap();
        let site = &sites.records[0];
        assert_eq!(site.town, None);
        assert_eq!(site.latitude, None);
        assert_eq!(site.longitude, None);
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let csv = "Parameter,Unit,Analytical_Method_ID\nEscherichia coli,MPN/100ml,EC1\n";
        let methods = read_methods(csv.as_bytes()).unwrap();
        assert_eq!(methods.records[0].method_id, "EC1");
        assert_eq!(methods.records[0].parameter_name.as_deref(), Some("Escherichia coli"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "Date_Collected,Site_ID,QAQC_Status,Reporting_Result,Analytical_Method_ID\n";
        match read_raw_results(csv.as_bytes()) {
            Err(StartupError::MissingColumn { column, .. }) => assert_eq!(column, "Time_Collected"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_source_is_empty() {
        let csv = RESULT_COLUMNS.join(",") + "\n";
        let results = read_raw_results(csv.as_bytes()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = load_sites("does/not/exist/Monitoring_Sites.csv");
        assert!(matches!(result, Err(StartupError::SourceMissing { .. })));
    }

    #[test]
    fn test_source_paths_from_dir() {
        let paths = SourcePaths::from_dir("data");
        assert_eq!(paths.sites, Path::new("data").join("Monitoring_Sites.csv"));
        assert_eq!(paths.results, Path::new("data").join("Results.csv"));
        assert_eq!(paths.methods, Path::new("data").join("Analytical_Methods.csv"));
    }
}
