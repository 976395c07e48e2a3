//! Hierarchical roll-up of counties into states and states into countries

use super::{Reconciler, Stage};
use crate::app::models::{Interventions, Place, PlaceKey};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

impl Reconciler {
    /// Stage 4: sum child places into their parents and discard the children
    ///
    /// County-to-state runs first so a country listed in both lists ends up
    /// fully rolled into its country-level place.
    pub fn consolidate(&mut self) -> Result<()> {
        self.advance(Stage::Audited, Stage::Consolidated)?;

        let county_countries = self.settings.county_to_state.clone();
        for country in &county_countries {
            let merged = self.counties_into_states(country)?;
            if merged > 0 {
                info!("Consolidated {} counties of {} into states", merged, country);
            }
            self.stats.counties_consolidated += merged;
        }

        let province_countries = self.settings.state_to_country.clone();
        for country in &province_countries {
            let merged = self.provinces_into_country(country)?;
            if merged > 0 {
                info!("Consolidated {} provinces of {} into the country", merged, country);
            }
            self.stats.provinces_consolidated += merged;
        }
        Ok(())
    }

    fn counties_into_states(&mut self, country: &str) -> Result<usize> {
        let counties: Vec<PlaceKey> = self
            .places
            .keys()
            .filter(|k| k.country == country && k.is_district())
            .cloned()
            .collect();

        for key in &counties {
            let Some(county) = self.places.remove(key) else {
                continue;
            };
            let state_key = key.province_key();
            if !self.places.contains_key(&state_key) {
                let state = self.new_state(state_key.clone(), &county);
                self.places.insert(state_key.clone(), state);
            }
            if let Some(state) = self.places.get_mut(&state_key) {
                state.absorb(&county)?;
            }
        }
        Ok(counties.len())
    }

    /// A state that only ever appeared through its counties
    fn new_state(&mut self, key: PlaceKey, county: &Place) -> Place {
        debug!("Creating {} from its counties", key);
        let interventions = Interventions::Unknown(Arc::clone(&self.unknown_interventions));
        let mut state = Place::new(key.clone(), &self.dates, interventions);
        state.population = match self.populations.get(&key) {
            Some(population) => {
                self.populations_recorded.insert(key);
                Some(*population)
            }
            None => county.population,
        };
        self.stats.places_created += 1;
        state
    }

    fn provinces_into_country(&mut self, country: &str) -> Result<usize> {
        let provinces: Vec<PlaceKey> = self
            .places
            .keys()
            .filter(|k| k.country == country && !k.is_country())
            .cloned()
            .collect();
        if provinces.is_empty() {
            return Ok(0);
        }

        let children: Vec<Place> = provinces
            .iter()
            .filter_map(|key| self.places.remove(key))
            .collect();
        let parent = self.place_entry(PlaceKey::country_level(country));
        for child in &children {
            parent.absorb(child)?;
        }
        Ok(children.len())
    }
}
