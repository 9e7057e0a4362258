use serde::{Deserialize, Serialize};

/// Column names of the lab results source that the pipeline reads.
pub const RESULT_COLUMNS: [&str; 6] = [
    "Date_Collected",
    "Time_Collected",
    "Site_ID",
    "QAQC_Status",
    "Reporting_Result",
    "Analytical_Method_ID",
];

/// One lab result row exactly as exported, before any cleaning.
///
/// Every field is kept as text; blank cells load as `None`. Rows are
/// discarded once the canonical table is built.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(rename = "Site_ID")]
    pub site_id: Option<String>,
    #[serde(rename = "Date_Collected")]
    pub date_collected: Option<String>,
    #[serde(rename = "Time_Collected")]
    pub time_collected: Option<String>,
    #[serde(rename = "QAQC_Status")]
    pub qaqc_status: Option<String>,
    #[serde(rename = "Analytical_Method_ID")]
    pub analytical_method_id: Option<String>,
    #[serde(rename = "Reporting_Result")]
    pub reporting_result: Option<String>,
}

/// All raw lab results, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResultTable {
    pub records: Vec<RawResult>,
}

impl RawResultTable {
    pub fn new(records: Vec<RawResult>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
