//! Core types and data pipeline for water quality monitoring records.
//!
//! Sites, lab results and the analytical method catalog are loaded from
//! their fixed CSV schemas, cleaned and joined into one canonical table,
//! and E. coli readings are bucketed into severity levels.

pub mod canonical;
pub mod error;
pub mod loader;
pub mod method;
pub mod normalize;
pub mod raw_result;
pub mod severity;
pub mod site;

/// Parameter name of the bacterial indicator that drives the map view.
pub const ECOLI_PARAMETER: &str = "Escherichia coli";
