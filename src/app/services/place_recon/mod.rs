//! Place name canonicalisation service
//!
//! Every source spells places its own way. [`PlaceRecon`] maps each raw
//! `(country, province, district)` triple onto one canonical [`PlaceKey`],
//! or discards it, using a validated [`RuleSet`]. Canonicalisation is
//! idempotent: feeding a canonical key back in returns it unchanged.
//!
//! The service also remembers which rename rules fired and which country
//! names it did not recognise so the coverage audit can report them.

use crate::app::models::PlaceKey;
use crate::Result;
use std::collections::BTreeSet;
use tracing::{debug, trace};

pub mod patterns;
pub mod rules;
pub mod stats;

#[cfg(test)]
mod tests;

pub use rules::{RenameRule, RuleFile, RuleSet};
pub use stats::ReconStats;

/// Canonicalises raw place keys and tracks rule usage
#[derive(Debug, Clone)]
pub struct PlaceRecon {
    rules: RuleSet,
    used_renames: BTreeSet<PlaceKey>,
    used_aliases: BTreeSet<String>,
    unrecognized_countries: BTreeSet<String>,
    stats: ReconStats,
}

impl PlaceRecon {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            used_renames: BTreeSet::new(),
            used_aliases: BTreeSet::new(),
            unrecognized_countries: BTreeSet::new(),
            stats: ReconStats::new(),
        }
    }

    /// Service backed by the built-in rule table
    pub fn with_default_rules() -> Result<Self> {
        Ok(Self::new(RuleSet::builtin()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn stats(&self) -> &ReconStats {
        &self.stats
    }

    /// Map a raw key to its canonical key, or `None` when it must be dropped
    pub fn canonicalize(&mut self, raw: &PlaceKey) -> Option<PlaceKey> {
        self.stats.keys_processed += 1;

        if let Some(target) = self.rules.renames().get(raw) {
            trace!("Renamed {} -> {}", raw, target);
            self.used_renames.insert(raw.clone());
            self.stats.renamed += 1;
            let target = target.clone();
            self.note_country(&target.country);
            return Some(target);
        }
        if self.rules.drops().contains(raw) {
            trace!("Dropped {}", raw);
            self.stats.dropped += 1;
            return None;
        }

        let mut key = raw.clone();

        if let Some(country) = self.rules.country_aliases().get(&key.country) {
            self.used_aliases.insert(key.country.clone());
            self.stats.aliased += 1;
            key.country = country.clone();
        }

        if self.rules.expands_us_counties() {
            if let Some(expanded) = patterns::expand_county_province(&key) {
                trace!("Expanded {} -> {}", key, expanded);
                self.stats.expanded += 1;
                key = expanded;
            }
        }

        if key != *raw {
            if let Some(target) = self.rules.renames().get(&key) {
                trace!("Renamed {} -> {}", key, target);
                self.used_renames.insert(key.clone());
                self.stats.renamed += 1;
                key = target.clone();
            } else if self.rules.drops().contains(&key) {
                trace!("Dropped {} (raw {})", key, raw);
                self.stats.dropped += 1;
                return None;
            }
        }

        self.note_country(&key.country);
        Some(key)
    }

    fn note_country(&mut self, country: &str) {
        if !self.rules.is_known_country(country) && !self.unrecognized_countries.contains(country) {
            debug!("Unrecognized country: {}", country);
            self.unrecognized_countries.insert(country.to_string());
        }
    }

    /// Rename rules that no key has exercised, formatted for reporting
    pub fn unused_renames(&self) -> Vec<String> {
        self.rules
            .renames()
            .iter()
            .filter(|(from, _)| !self.used_renames.contains(*from))
            .map(|(from, to)| format!("{} => {}", from, to))
            .collect()
    }

    /// Country aliases that no key has exercised
    pub fn unused_aliases(&self) -> Vec<String> {
        self.rules
            .country_aliases()
            .keys()
            .filter(|alias| !self.used_aliases.contains(*alias))
            .cloned()
            .collect()
    }

    /// Country names seen that the rule set does not recognise, sorted
    pub fn unrecognized_countries(&self) -> Vec<String> {
        self.unrecognized_countries.iter().cloned().collect()
    }
}
