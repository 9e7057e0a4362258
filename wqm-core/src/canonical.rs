//! The canonical table: every cleaned, joined and classified result.
//!
//! Built once at startup and never mutated. Handlers share it through an
//! `Arc`; [`TableHandle`] lets a reload swap in a new table while readers
//! keep whichever snapshot they already hold.

use crate::error::Result;
use crate::loader::{load_methods, load_raw_results, load_sites, SourcePaths};
use crate::method::MethodTable;
use crate::normalize::{normalize_with_report, DropReport, NormalizedResult};
use crate::raw_result::RawResultTable;
use crate::severity::classify;
use crate::site::SiteTable;
use crate::ECOLI_PARAMETER;
use log::info;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    rows: Vec<NormalizedResult>,
    parameters: Vec<String>,
    report: DropReport,
}

impl CanonicalTable {
    /// Build the table from already loaded sources.
    pub fn from_sources(raw_results: &RawResultTable, sites: &SiteTable, methods: &MethodTable) -> Self {
        let (rows, report) = normalize_with_report(raw_results, sites, methods);
        Self {
            rows: classify(rows),
            parameters: methods.parameters(),
            report,
        }
    }

    /// Load all three sources and build the table.
    pub fn load(paths: &SourcePaths) -> Result<Self> {
        let sites = load_sites(&paths.sites)?;
        let methods = load_methods(&paths.methods)?;
        let raw_results = load_raw_results(&paths.results)?;
        Ok(Self::from_sources(&raw_results, &sites, &methods))
    }

    /// All rows, ascending by collection datetime.
    pub fn rows(&self) -> &[NormalizedResult] {
        &self.rows
    }

    /// Rows the severity classifier operated on.
    pub fn ecoli_rows(&self) -> impl Iterator<Item = &NormalizedResult> {
        self.rows
            .iter()
            .filter(|row| row.parameter_name == ECOLI_PARAMETER)
    }

    /// Every parameter in the method catalog, sorted ascending.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn drop_report(&self) -> &DropReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shared, swappable reference to the current canonical table.
#[derive(Debug, Clone, Default)]
pub struct TableHandle {
    current: Arc<RwLock<Arc<CanonicalTable>>>,
}

impl TableHandle {
    pub fn new(table: CanonicalTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// The table as of now. Later swaps do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<CanonicalTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the current table in a single write.
    pub fn replace(&self, table: CanonicalTable) -> Arc<CanonicalTable> {
        let table = Arc::new(table);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&table);
        info!("canonical: Swapped in table with {} rows", table.len());
        table
    }

    /// Rebuild from source files. On failure the previous table stays current.
    pub fn reload(&self, paths: &SourcePaths) -> Result<Arc<CanonicalTable>> {
        let table = CanonicalTable::load(paths)?;
        Ok(self.replace(table))
    }
}
