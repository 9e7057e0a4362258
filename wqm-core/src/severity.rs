use crate::normalize::NormalizedResult;
use crate::ECOLI_PARAMETER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (exclusive) of readings safe for swimming, in MPN/100ml.
pub const SWIMMING_LIMIT: f64 = 126.0;

/// Upper bound (exclusive) of readings safe for boating.
pub const BOATING_LIMIT: f64 = 630.0;

/// Readings at or above this bound are left unclassified.
pub const CLASSIFIED_LIMIT: f64 = 100_000.0;

/// Bacterial contamination bucket of an E. coli reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    Swimming,
    Boating,
    Danger,
}

/// Marker color of a severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl SeverityLevel {
    /// Bucket a reading: [0, 126) Swimming, [126, 630) Boating,
    /// [630, 100000) Danger. Anything else is unclassified.
    pub fn from_reading(value: f64) -> Option<Self> {
        match value {
            v if (0.0..SWIMMING_LIMIT).contains(&v) => Some(SeverityLevel::Swimming),
            v if (SWIMMING_LIMIT..BOATING_LIMIT).contains(&v) => Some(SeverityLevel::Boating),
            v if (BOATING_LIMIT..CLASSIFIED_LIMIT).contains(&v) => Some(SeverityLevel::Danger),
            _ => None,
        }
    }

    pub fn color(self) -> Color {
        match self {
            SeverityLevel::Swimming => Color::Green,
            SeverityLevel::Boating => Color::Yellow,
            SeverityLevel::Danger => Color::Blue,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Assign severity and color to E. coli rows; all other rows carry neither.
pub fn classify(results: Vec<NormalizedResult>) -> Vec<NormalizedResult> {
    results
        .into_iter()
        .map(|mut row| {
            row.severity = if row.parameter_name == ECOLI_PARAMETER {
                SeverityLevel::from_reading(row.reporting_result)
            } else {
                None
            };
            row.color = row.severity.map(SeverityLevel::color);
            row
        })
        .collect()
}
