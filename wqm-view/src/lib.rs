//! Selection state and view descriptions for the map and chart.
//!
//! This crate provides:
//! - `queries`: pure filters over the canonical table (date options, map rows, chart series)
//! - `selection`: per-session `SelectionState` and the event-driven `SelectionResolver`
//! - `projection`: renderer-neutral `MapView` / `ChartView` descriptions

pub mod projection;
pub mod queries;
pub mod selection;

#[cfg(test)]
pub(crate) mod test_support {
    use wqm_core::canonical::CanonicalTable;
    use wqm_core::loader::{read_methods, read_raw_results, read_sites};

    const SITES_CSV: &str = include_str!("../../fixtures/Monitoring_Sites.csv");
    const RESULTS_CSV: &str = include_str!("../../fixtures/Results.csv");
    const METHODS_CSV: &str = include_str!("../../fixtures/Analytical_Methods.csv");

    pub fn fixture_table() -> CanonicalTable {
        CanonicalTable::from_sources(
            &read_raw_results(RESULTS_CSV.as_bytes()).unwrap(),
            &read_sites(SITES_CSV.as_bytes()).unwrap(),
            &read_methods(METHODS_CSV.as_bytes()).unwrap(),
        )
    }
}
