use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column names of the monitoring sites source, in their fixed schema.
pub const SITE_COLUMNS: [&str; 6] = [
    "Site_ID",
    "Site_Name",
    "Town",
    "Latitude_DD",
    "Longitude_DD",
    "Site_Description",
];

/// A monitoring site from the sites reference table.
///
/// Coordinates that are blank or non-numeric load as `None`; results joined
/// to such a site are later dropped by the normalizer.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(rename = "Site_ID")]
    pub site_id: String,
    #[serde(rename = "Site_Name")]
    pub site_name: Option<String>,
    #[serde(rename = "Town")]
    pub town: Option<String>,
    #[serde(rename = "Latitude_DD", deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude_DD", deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "Site_Description")]
    pub description: Option<String>,
}

/// All monitoring sites, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTable {
    pub records: Vec<SiteRecord>,
}

impl SiteTable {
    pub fn new(records: Vec<SiteRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index sites by `site_id`. A duplicated id resolves to its last row.
    pub fn index(&self) -> HashMap<&str, &SiteRecord> {
        self.records
            .iter()
            .map(|site| (site.site_id.trim(), site))
            .collect()
    }
}
