//! Reconciliation statistics

use serde::{Deserialize, Serialize};

/// Counters collected across the reconciliation stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Daily report rows read
    pub rows_seen: usize,

    /// Rows whose counts were merged into a place
    pub rows_merged: usize,

    /// Rows with no country column or an empty country
    pub rows_without_country: usize,

    /// Rows on the fixed garbage list
    pub rows_thrown_away: usize,

    /// Rows whose key canonicalised to "drop"
    pub rows_dropped: usize,

    /// Count or coordinate cells that could not be parsed
    pub invalid_cells: usize,

    pub places_created: usize,

    /// Side-table rows whose key canonicalised to "drop"
    pub population_rows_dropped: usize,
    pub intervention_rows_dropped: usize,

    /// Side-table rows that collided with an earlier row after canonicalisation
    pub duplicate_population_keys: usize,
    pub duplicate_intervention_keys: usize,

    /// Places folded into a parent during consolidation
    pub counties_consolidated: usize,
    pub provinces_consolidated: usize,

    pub corrections_applied: usize,
    pub corrections_skipped: usize,

    /// Rows in the mobility report
    pub mobility_rows: usize,
}

impl ReconcileStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows that were read but contributed nothing
    pub fn rows_discarded(&self) -> usize {
        self.rows_without_country + self.rows_thrown_away + self.rows_dropped
    }

    /// Percentage of report rows merged into a place
    pub fn merge_rate(&self) -> f64 {
        if self.rows_seen == 0 {
            0.0
        } else {
            (self.rows_merged as f64 / self.rows_seen as f64) * 100.0
        }
    }
}
