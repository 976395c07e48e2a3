//! Test fixtures for output writing

use crate::app::models::time_series::{DateRange, TimeSeries};
use crate::app::models::{Interventions, Place, PlaceKey};
use chrono::NaiveDate;
use std::collections::BTreeMap;

mod snapshot_tests;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
}

/// 2020-03-01 to 2020-03-02
pub fn dates() -> DateRange {
    DateRange::inclusive(day(1), day(2)).unwrap()
}

pub fn place(key: PlaceKey, confirmed: [i64; 2], deaths: [i64; 2]) -> Place {
    let sentinel = Interventions::unknown_sentinel(day(1), 2);
    let mut place = Place::new(key, &dates(), Interventions::Unknown(sentinel));
    place.confirmed = TimeSeries::new(day(1), confirmed.to_vec());
    place.deaths = TimeSeries::new(day(1), deaths.to_vec());
    place
}

/// A country, a province, a district and a place without cases
pub fn sample_places() -> BTreeMap<PlaceKey, Place> {
    let mut italy = place(PlaceKey::country_level("Italy"), [3, 5], [0, 1]);
    italy.latitude = Some(41.87);
    italy.longitude = Some(12.56);
    italy.population = Some(60_000_000);

    let hubei = place(PlaceKey::province_level("China", "Hubei"), [444, 549], [17, 24]);
    let king = place(PlaceKey::new("United States", "Washington", "King"), [1, 2], [0, 0]);
    let quiet = place(PlaceKey::country_level("Tonga"), [0, 0], [0, 0]);

    [italy, hubei, king, quiet]
        .into_iter()
        .map(|p| (p.key().clone(), p))
        .collect()
}
