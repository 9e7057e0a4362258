use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Column names of the analytical methods source.
pub const METHOD_COLUMNS: [&str; 2] = ["Analytical_Method_ID", "Parameter"];

/// A lab procedure and the parameter (substance) it measures.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MethodRecord {
    #[serde(rename = "Analytical_Method_ID")]
    pub method_id: String,
    #[serde(rename = "Parameter")]
    pub parameter_name: Option<String>,
}

/// The analytical method catalog, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodTable {
    pub records: Vec<MethodRecord>,
}

impl MethodTable {
    pub fn new(records: Vec<MethodRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Map `method_id` to its parameter name. A duplicated id resolves to its
    /// last row; methods without a parameter are left out.
    pub fn index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for method in &self.records {
            let id = method.method_id.trim();
            match method.parameter_name.as_deref().map(str::trim) {
                Some(parameter) if !parameter.is_empty() => {
                    index.insert(id, parameter);
                }
                _ => {
                    index.remove(id);
                }
            }
        }
        index
    }

    /// Unique, non-empty parameter names, sorted ascending.
    pub fn parameters(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|m| m.parameter_name.as_deref().map(str::trim))
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
