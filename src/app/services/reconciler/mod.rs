//! Reconciliation driver
//!
//! Folds the parsed sources into one [`Place`] per canonical key. The stages
//! run in a fixed order and each may run only once:
//!
//! 1. canonicalise the population and intervention keys
//! 2. merge the daily report rows
//! 3. audit coverage (advisory)
//! 4. consolidate counties into states and states into countries
//! 5. apply the point corrections
//!
//! All state, including the canonicaliser's diagnostics, is owned by one
//! [`Reconciler`] value.

use crate::app::models::audit::{CountryCollision, CoverageReport};
use crate::app::models::time_series::{DateRange, TimeSeries};
use crate::app::models::{Interventions, Metric, Place, PlaceKey};
use crate::app::services::country_codes::CountryCodeLookup;
use crate::app::services::place_recon::{PlaceRecon, ReconStats};
use crate::app::services::source_tables::{
    CaseRecord, CaseReports, InterventionTable, PopulationTable, SourceTables,
};
use crate::config::ReconciliationConfig;
use crate::constants::THROW_AWAY_PLACES;
use crate::{Error, Result};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

mod consolidation;
pub mod corrections;
pub mod stats;

#[cfg(test)]
mod tests;

pub use corrections::{Correction, CorrectionOutcome};
pub use stats::ReconcileStats;

/// Progress through the reconciliation stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Created,
    SourcesCanonicalized,
    CaseDataMerged,
    Audited,
    Consolidated,
    Corrected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::SourcesCanonicalized => "sources canonicalized",
            Stage::CaseDataMerged => "case data merged",
            Stage::Audited => "audited",
            Stage::Consolidated => "consolidated",
            Stage::Corrected => "corrected",
        };
        f.write_str(name)
    }
}

/// Everything a completed run produces
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    pub places: BTreeMap<PlaceKey, Place>,
    pub coverage: CoverageReport,
    pub stats: ReconcileStats,
    pub recon_stats: ReconStats,
}

/// Owns the place map and every diagnostic set for one run
pub struct Reconciler {
    recon: PlaceRecon,
    country_codes: Box<dyn CountryCodeLookup>,
    settings: ReconciliationConfig,
    dates: DateRange,
    stage: Stage,

    places: BTreeMap<PlaceKey, Place>,
    populations: BTreeMap<PlaceKey, u64>,
    interventions: BTreeMap<PlaceKey, TimeSeries<String>>,
    unknown_interventions: Arc<TimeSeries<String>>,

    populations_recorded: BTreeSet<PlaceKey>,
    interventions_recorded: BTreeSet<PlaceKey>,
    unknown_intervention_places: BTreeSet<PlaceKey>,

    stats: ReconcileStats,
}

impl Reconciler {
    pub fn new(
        recon: PlaceRecon,
        country_codes: Box<dyn CountryCodeLookup>,
        settings: ReconciliationConfig,
        dates: DateRange,
    ) -> Self {
        Self {
            recon,
            country_codes,
            settings,
            unknown_interventions: Interventions::unknown_sentinel(dates.start(), dates.len()),
            dates,
            stage: Stage::Created,
            places: BTreeMap::new(),
            populations: BTreeMap::new(),
            interventions: BTreeMap::new(),
            populations_recorded: BTreeSet::new(),
            interventions_recorded: BTreeSet::new(),
            unknown_intervention_places: BTreeSet::new(),
            stats: ReconcileStats::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn places(&self) -> &BTreeMap<PlaceKey, Place> {
        &self.places
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    pub fn recon(&self) -> &PlaceRecon {
        &self.recon
    }

    /// Run every stage over the parsed sources
    pub fn run(mut self, tables: SourceTables) -> Result<ReconciliationResult> {
        let SourceTables {
            case_reports,
            population,
            interventions,
            mobility,
        } = tables;

        self.stats.mobility_rows = mobility.len();
        info!(
            "Mobility report: {} rows covering {} countries (not reconciled)",
            mobility.len(),
            mobility.countries().len()
        );

        self.canonicalize_sources(&population, interventions)?;
        self.merge_case_reports(&case_reports)?;

        let mut coverage = self.audit_coverage()?;
        self.consolidate()?;
        self.settle_unconsumed(&mut coverage);
        coverage.log_findings();
        info!("{}", coverage.summary());

        self.apply_corrections()?;

        Ok(self.finish(coverage))
    }

    /// Consume the reconciler and hand back its results
    pub fn finish(self, coverage: CoverageReport) -> ReconciliationResult {
        ReconciliationResult {
            places: self.places,
            coverage,
            stats: self.stats,
            recon_stats: self.recon.stats().clone(),
        }
    }

    fn advance(&mut self, from: Stage, to: Stage) -> Result<()> {
        if self.stage != from {
            return Err(Error::data_validation(format!(
                "Reconciliation stage '{}' requires stage '{}', but the reconciler is at '{}'",
                to, from, self.stage
            )));
        }
        self.stage = to;
        Ok(())
    }

    /// Stage 1: canonicalise the keys of the population and intervention tables
    ///
    /// When two raw keys canonicalise to the same key the first row wins.
    pub fn canonicalize_sources(
        &mut self,
        population: &PopulationTable,
        interventions: InterventionTable,
    ) -> Result<()> {
        self.advance(Stage::Created, Stage::SourcesCanonicalized)?;

        for (raw, value) in population.entries() {
            let Some(key) = self.recon.canonicalize(raw) else {
                debug!("Dropped population row {}", raw);
                self.stats.population_rows_dropped += 1;
                continue;
            };
            match self.populations.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(*value);
                }
                Entry::Occupied(slot) => {
                    warn!(
                        "Population for {} listed twice (again as {}); keeping {}",
                        slot.key(),
                        raw,
                        slot.get()
                    );
                    self.stats.duplicate_population_keys += 1;
                }
            }
        }

        self.unknown_interventions = interventions.unknown_sentinel();
        for (raw, series) in interventions.into_entries() {
            let Some(key) = self.recon.canonicalize(&raw) else {
                debug!("Dropped intervention row {}", raw);
                self.stats.intervention_rows_dropped += 1;
                continue;
            };
            match self.interventions.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(series);
                }
                Entry::Occupied(slot) => {
                    warn!(
                        "Interventions for {} listed twice (again as {}); keeping the first row",
                        slot.key(),
                        raw
                    );
                    self.stats.duplicate_intervention_keys += 1;
                }
            }
        }

        info!(
            "Canonicalised {} population and {} intervention keys",
            self.populations.len(),
            self.interventions.len()
        );
        Ok(())
    }

    /// Stage 2: merge every daily report row into its place
    pub fn merge_case_reports(&mut self, reports: &CaseReports) -> Result<()> {
        self.advance(Stage::SourcesCanonicalized, Stage::CaseDataMerged)?;

        for (date, rows) in reports.iter() {
            for row in rows {
                self.stats.rows_seen += 1;
                let Some(record) = CaseRecord::from_row(row) else {
                    self.stats.rows_without_country += 1;
                    continue;
                };
                self.stats.invalid_cells += record.invalid_cells;

                if is_throw_away(&record.key) {
                    self.stats.rows_thrown_away += 1;
                    continue;
                }
                let Some(key) = self.recon.canonicalize(&record.key) else {
                    self.stats.rows_dropped += 1;
                    continue;
                };

                let place = self.place_entry(key);
                if let Some((latitude, longitude)) = record.coordinates() {
                    place.set_coordinates(latitude, longitude);
                }
                for metric in Metric::ALL {
                    place.update(metric, *date, record.count(metric))?;
                }
                self.stats.rows_merged += 1;
            }
        }

        info!(
            "Merged {} of {} report rows into {} places ({} invalid cells)",
            self.stats.rows_merged,
            self.stats.rows_seen,
            self.places.len(),
            self.stats.invalid_cells
        );
        Ok(())
    }

    /// The place for `key`, created on first sight with its side data attached
    fn place_entry(&mut self, key: PlaceKey) -> &mut Place {
        match self.places.entry(key) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                let interventions = match self.interventions.get(&key) {
                    Some(series) => {
                        self.interventions_recorded.insert(key.clone());
                        Interventions::Recorded(series.clone())
                    }
                    None => {
                        self.unknown_intervention_places.insert(key.clone());
                        Interventions::Unknown(Arc::clone(&self.unknown_interventions))
                    }
                };

                let mut place = Place::new(key.clone(), &self.dates, interventions);
                if let Some(population) = self.populations.get(&key) {
                    place.population = Some(*population);
                    self.populations_recorded.insert(key);
                }
                self.stats.places_created += 1;
                slot.insert(place)
            }
        }
    }

    /// Stage 3: collect advisory coverage findings
    pub fn audit_coverage(&mut self) -> Result<CoverageReport> {
        self.advance(Stage::CaseDataMerged, Stage::Audited)?;

        let (country_collisions, lookup_failures) = self.country_collisions();
        let silenced: BTreeSet<&PlaceKey> =
            self.settings.silenced_population_warnings.iter().collect();

        let missing_population = self
            .places
            .values()
            .filter(|p| !p.key().is_district() && p.population.is_none())
            .map(|p| p.key())
            .filter(|k| !silenced.contains(k))
            .cloned()
            .collect();
        let unknown_interventions = self
            .unknown_intervention_places
            .iter()
            .filter(|k| !k.is_district())
            .cloned()
            .collect();
        let unconsumed_interventions = self
            .interventions
            .keys()
            .filter(|k| !self.interventions_recorded.contains(*k))
            .cloned()
            .collect();
        let unconsumed_populations = self
            .populations
            .keys()
            .filter(|k| !self.populations_recorded.contains(*k))
            .cloned()
            .collect();

        Ok(CoverageReport {
            country_collisions,
            unrecognized_countries: self.recon.unrecognized_countries(),
            unused_renames: self.recon.unused_renames(),
            unused_aliases: self.recon.unused_aliases(),
            missing_population,
            unknown_interventions,
            unconsumed_interventions,
            unconsumed_populations,
            lookup_failures,
        })
    }

    /// Drop side-table rows from the report that consolidation attached
    ///
    /// A state that only appears through its counties picks up its population
    /// row while consolidating, after the audit has run.
    pub fn settle_unconsumed(&self, coverage: &mut CoverageReport) {
        coverage
            .unconsumed_populations
            .retain(|k| !self.populations_recorded.contains(k));
        coverage
            .unconsumed_interventions
            .retain(|k| !self.interventions_recorded.contains(k));
    }

    /// Pairs of place countries that share a country code
    fn country_collisions(&self) -> (Vec<CountryCollision>, Vec<String>) {
        let countries: BTreeSet<&str> = self
            .places
            .keys()
            .map(|k| k.country.as_str())
            .collect();

        let mut by_code: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        let mut failures = Vec::new();
        for country in countries {
            match self.country_codes.lookup(country) {
                Ok(Some(code)) => by_code.entry(code).or_default().push(country),
                Ok(None) => debug!("No country code for {}", country),
                Err(e) => {
                    warn!("Country code lookup failed for {}: {}", country, e);
                    failures.push(country.to_string());
                }
            }
        }

        let mut collisions = Vec::new();
        for (code, names) in &by_code {
            for (i, first) in names.iter().enumerate() {
                for second in &names[i + 1..] {
                    collisions.push(CountryCollision {
                        first: first.to_string(),
                        second: second.to_string(),
                        code: code.clone(),
                    });
                }
            }
        }
        (collisions, failures)
    }

    /// Stage 5: apply the configured corrections in order
    pub fn apply_corrections(&mut self) -> Result<()> {
        self.advance(Stage::Consolidated, Stage::Corrected)?;

        for correction in &self.settings.corrections {
            match correction.apply(&mut self.places)? {
                CorrectionOutcome::Applied => {
                    info!("Applied {}", correction);
                    self.stats.corrections_applied += 1;
                }
                CorrectionOutcome::Skipped(reason) => {
                    warn!("Skipped {}: {}", correction, reason);
                    self.stats.corrections_skipped += 1;
                }
            }
        }
        Ok(())
    }
}

/// Raw rows that duplicate or pollute data reported elsewhere
fn is_throw_away(key: &PlaceKey) -> bool {
    THROW_AWAY_PLACES.iter().any(|(country, province, district)| {
        key.country == *country && key.province == *province && key.district == *district
    })
}
