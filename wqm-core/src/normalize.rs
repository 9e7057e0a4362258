//! Cleaning and joining of raw lab results into canonical rows.
//!
//! Each raw row passes through the cleaning steps in order; the first step
//! it fails names the [`DropReason`] it is excluded for:
//!
//! 1. QAQC status must contain "accepted" (case-insensitive)
//! 2. Date_Collected must parse; Time_Collected defaults to midnight
//! 3. Reporting_Result must be a finite number
//! 4. Site_ID must be present and match a site with coordinates
//! 5. Analytical_Method_ID must be present and map to a parameter
//!
//! Surviving rows are sorted by collection datetime. Ties keep source order.

use crate::method::MethodTable;
use crate::raw_result::{RawResult, RawResultTable};
use crate::severity::{Color, SeverityLevel};
use crate::site::{SiteRecord, SiteTable};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use wqm_utils::dates::{parse_collection_date, parse_collection_time};

/// A cleaned, joined lab result: one row of the canonical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub site_id: String,
    pub site_name: String,
    pub town: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub date_collected: NaiveDate,
    pub datetime: NaiveDateTime,
    pub qaqc_status: String,
    pub analytical_method_id: String,
    pub parameter_name: String,
    pub reporting_result: f64,
    /// Set by the classifier on E. coli rows only.
    pub severity: Option<SeverityLevel>,
    pub color: Option<Color>,
}

/// Why a raw row was left out of the canonical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    QaqcNotAccepted,
    InvalidDate,
    NonNumericResult,
    MissingSiteId,
    UnmatchedSite,
    MissingCoordinates,
    MissingMethodId,
    UnmatchedMethod,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DropReason::QaqcNotAccepted => "QAQC status not accepted",
            DropReason::InvalidDate => "unparseable collection date",
            DropReason::NonNumericResult => "non-numeric reporting result",
            DropReason::MissingSiteId => "missing site id",
            DropReason::UnmatchedSite => "site id not in sites table",
            DropReason::MissingCoordinates => "site has no coordinates",
            DropReason::MissingMethodId => "missing analytical method id",
            DropReason::UnmatchedMethod => "method id has no parameter",
        };
        f.write_str(reason)
    }
}

/// Counts of rows kept and dropped by one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropReport {
    pub total: usize,
    pub kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl DropReport {
    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// Coerce a reporting result to a number, rejecting blanks, text and non-finite values.
pub fn parse_reporting_result(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_accepted(status: Option<&str>) -> bool {
    status.is_some_and(|s| s.to_lowercase().contains("accepted"))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// File line of the `index`th data row; line 1 is the header.
fn source_line(index: usize) -> usize {
    index + 2
}

fn clean_row(
    raw: &RawResult,
    sites: &HashMap<&str, &SiteRecord>,
    methods: &HashMap<&str, &str>,
) -> Result<NormalizedResult, DropReason> {
    let qaqc_status = raw.qaqc_status.as_deref();
    if !is_accepted(qaqc_status) {
        return Err(DropReason::QaqcNotAccepted);
    }

    let date_collected = raw
        .date_collected
        .as_deref()
        .and_then(parse_collection_date)
        .ok_or(DropReason::InvalidDate)?;
    let time_collected = parse_collection_time(raw.time_collected.as_deref());
    let datetime = date_collected.and_time(time_collected);

    let reporting_result = raw
        .reporting_result
        .as_deref()
        .and_then(parse_reporting_result)
        .ok_or(DropReason::NonNumericResult)?;

    let site_id = non_empty(raw.site_id.as_deref()).ok_or(DropReason::MissingSiteId)?;
    let site = sites.get(site_id).ok_or(DropReason::UnmatchedSite)?;
    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
    let (latitude, longitude) = match (finite(site.latitude), finite(site.longitude)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(DropReason::MissingCoordinates),
    };

    let method_id =
        non_empty(raw.analytical_method_id.as_deref()).ok_or(DropReason::MissingMethodId)?;
    let parameter_name = methods.get(method_id).ok_or(DropReason::UnmatchedMethod)?;

    Ok(NormalizedResult {
        site_id: site_id.to_string(),
        site_name: site.site_name.clone().unwrap_or_default(),
        town: site.town.clone(),
        latitude,
        longitude,
        date_collected,
        datetime,
        qaqc_status: qaqc_status.unwrap_or_default().to_string(),
        analytical_method_id: method_id.to_string(),
        parameter_name: parameter_name.to_string(),
        reporting_result,
        severity: None,
        color: None,
    })
}

/// Clean, join and sort raw results, reporting why each dropped row was excluded.
pub fn normalize_with_report(
    raw_results: &RawResultTable,
    sites: &SiteTable,
    methods: &MethodTable,
) -> (Vec<NormalizedResult>, DropReport) {
    let site_index = sites.index();
    let method_index = methods.index();
    let mut report = DropReport {
        total: raw_results.len(),
        ..DropReport::default()
    };

    let mut rows = Vec::with_capacity(raw_results.len());
    for (index, raw) in raw_results.records.iter().enumerate() {
        match clean_row(raw, &site_index, &method_index) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                debug!(
                    "normalize: dropped result at line {}: {}",
                    source_line(index),
                    reason
                );
                *report.dropped.entry(reason).or_default() += 1;
            }
        }
    }
    rows.sort_by_key(|row| row.datetime);
    report.kept = rows.len();

    info!(
        "normalize: Kept {} of {} results, dropped {}",
        report.kept,
        report.total,
        report.dropped_total()
    );
    (rows, report)
}

/// Clean, join and sort raw results into canonical rows.
pub fn normalize(
    raw_results: &RawResultTable,
    sites: &SiteTable,
    methods: &MethodTable,
) -> Vec<NormalizedResult> {
    normalize_with_report(raw_results, sites, methods).0
}
