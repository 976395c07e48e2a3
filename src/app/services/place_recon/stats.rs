//! Canonicalisation statistics

use serde::{Deserialize, Serialize};

/// Counts of what canonicalisation did to the keys it saw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconStats {
    /// Keys passed through `canonicalize`
    pub keys_processed: usize,

    /// Keys changed by an exact rename
    pub renamed: usize,

    /// Keys whose country was replaced by an alias
    pub aliased: usize,

    /// Early-feed US provinces expanded into county keys
    pub expanded: usize,

    /// Keys discarded by the drop list
    pub dropped: usize,
}

impl ReconStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys that came out different from how they went in, drops included
    pub fn changed(&self) -> usize {
        self.renamed + self.aliased + self.expanded + self.dropped
    }

    /// Percentage of processed keys that were left untouched
    pub fn unchanged_rate(&self) -> f64 {
        if self.keys_processed == 0 {
            0.0
        } else {
            let unchanged = self.keys_processed.saturating_sub(self.changed());
            (unchanged as f64 / self.keys_processed as f64) * 100.0
        }
    }
}
