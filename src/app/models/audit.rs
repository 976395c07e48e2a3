//! Data models for coverage audit results
//!
//! This module contains the structures produced by the coverage validation
//! stage. Every finding is advisory: the pipeline logs them and carries on.

use super::PlaceKey;
use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// Coverage Report Structure
// =============================================================================

/// Everything the coverage audit found after merging the case reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Distinct country names that resolve to the same ISO code
    pub country_collisions: Vec<CountryCollision>,

    /// Country names no rule recognised
    pub unrecognized_countries: Vec<String>,

    /// Rename rules that no source row exercised
    pub unused_renames: Vec<String>,

    /// Country aliases that no source row exercised
    pub unused_aliases: Vec<String>,

    /// Province or country level places without population data
    pub missing_population: Vec<PlaceKey>,

    /// Places that fell back to the unknown intervention series
    pub unknown_interventions: Vec<PlaceKey>,

    /// Intervention table rows never attached to a place
    pub unconsumed_interventions: Vec<PlaceKey>,

    /// Population table rows never attached to a place
    pub unconsumed_populations: Vec<PlaceKey>,

    /// Country names the code lookup service failed on
    pub lookup_failures: Vec<String>,
}

/// Two country names that map to one country code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCollision {
    pub first: String,
    pub second: String,
    pub code: String,
}

impl CoverageReport {
    /// Total number of findings across every category
    pub fn total_issues(&self) -> usize {
        self.country_collisions.len()
            + self.unrecognized_countries.len()
            + self.unused_renames.len()
            + self.unused_aliases.len()
            + self.missing_population.len()
            + self.unknown_interventions.len()
            + self.unconsumed_interventions.len()
            + self.unconsumed_populations.len()
            + self.lookup_failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues() == 0
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Coverage: {} collisions | {} unrecognized countries | {} unused renames | \
             {} unused aliases | {} without population | {} without interventions | \
             {} lost intervention rows | {} lost population rows",
            self.country_collisions.len(),
            self.unrecognized_countries.len(),
            self.unused_renames.len(),
            self.unused_aliases.len(),
            self.missing_population.len(),
            self.unknown_interventions.len(),
            self.unconsumed_interventions.len(),
            self.unconsumed_populations.len()
        )
    }

    /// Emit one warning per finding
    pub fn log_findings(&self) {
        for collision in &self.country_collisions {
            warn!(
                "Country collision {} {} --> {}",
                collision.first, collision.second, collision.code
            );
        }
        for country in &self.unrecognized_countries {
            warn!("Unrecognized country: {}", country);
        }
        for rule in &self.unused_renames {
            warn!("Unused rename: {}", rule);
        }
        for alias in &self.unused_aliases {
            warn!("Unused alias: {}", alias);
        }
        for key in &self.missing_population {
            warn!("No population data: {}", key);
        }
        for key in &self.unknown_interventions {
            warn!("No intervention data: {}", key);
        }
        for key in &self.unconsumed_interventions {
            warn!("Lost intervention data for: {}", key);
        }
        for key in &self.unconsumed_populations {
            warn!("Lost population data for: {}", key);
        }
        for name in &self.lookup_failures {
            warn!("Country code lookup failed for: {}", name);
        }
    }
}
