//! Pure filters over the canonical table.
//!
//! Nothing here is cached; every call recomputes from the table it is given.
//! Selections that match no rows produce empty results, never errors.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use wqm_core::canonical::CanonicalTable;
use wqm_core::normalize::NormalizedResult;

/// A single (datetime, value) pair of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub datetime: NaiveDateTime,
    pub value: f64,
}

/// Readings at one site, grouped by parameter and ordered by datetime.
///
/// Parameters without any reading at the site are absent from `by_parameter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSeries {
    pub site_name: String,
    pub by_parameter: BTreeMap<String, Vec<SeriesPoint>>,
}

impl SiteSeries {
    pub fn is_empty(&self) -> bool {
        self.by_parameter.is_empty()
    }
}

/// Dates that carry at least one E. coli reading, most recent first.
pub fn available_dates(table: &CanonicalTable) -> Vec<NaiveDate> {
    table
        .ecoli_rows()
        .map(|row| row.date_collected)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// E. coli rows collected on `date`. No date selects nothing.
pub fn map_points(table: &CanonicalTable, date: Option<NaiveDate>) -> Vec<&NormalizedResult> {
    let Some(date) = date else {
        return Vec::new();
    };
    table
        .ecoli_rows()
        .filter(|row| row.date_collected == date)
        .collect()
}

/// All readings at `site_name` for the chosen parameters, across every date.
///
/// Returns `None` when no site is selected or no parameter is chosen. An
/// unknown site yields an empty [`SiteSeries`].
pub fn chart_series(
    table: &CanonicalTable,
    site_name: Option<&str>,
    parameters: &BTreeSet<String>,
) -> Option<SiteSeries> {
    let site_name = site_name?;
    if parameters.is_empty() {
        return None;
    }

    let mut by_parameter: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
    for row in table
        .rows()
        .iter()
        .filter(|row| row.site_name == site_name && parameters.contains(&row.parameter_name))
    {
        by_parameter
            .entry(row.parameter_name.clone())
            .or_default()
            .push(SeriesPoint {
                datetime: row.datetime,
                value: row.reporting_result,
            });
    }

    Some(SiteSeries {
        site_name: site_name.to_string(),
        by_parameter,
    })
}

/// Whether `date` is one of the selectable dates.
pub fn has_ecoli_readings(table: &CanonicalTable, date: NaiveDate) -> bool {
    table.ecoli_rows().any(|row| row.date_collected == date)
}
