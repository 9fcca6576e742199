use serde::{Deserialize, Serialize};

use crate::ContentRecord;

/// Aggregated result of a batch import
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportSummary {
    pub success_count: usize,
    pub failure_count: usize,
    /// Successes that wrote a new row (the rest were already in the catalog)
    pub created_count: usize,
    /// One record per successful id, in input order
    pub records: Vec<ContentRecord>,
    /// "{id}: {message}" per failed id, in input order
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count == 0
    }
}
