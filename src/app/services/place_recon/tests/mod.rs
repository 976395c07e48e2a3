//! Test utilities for place canonicalisation

use crate::app::models::PlaceKey;

use super::PlaceRecon;

mod canonicalize_tests;
mod rules_tests;

/// Service with the built-in rules
pub fn builtin_recon() -> PlaceRecon {
    PlaceRecon::with_default_rules().unwrap()
}

/// Shorthand for building keys in assertions
pub fn key(country: &str, province: &str, district: &str) -> PlaceKey {
    PlaceKey::new(country, province, district)
}

/// Raw keys in the shapes the daily feed has used over time
pub fn sample_raw_keys() -> Vec<PlaceKey> {
    vec![
        key("US", "Washington", ""),
        key("US", "Washington", "King"),
        key("US", "King County, WA", ""),
        key("US", "Travis, CA (From Diamond Princess)", ""),
        key("US", "Diamond Princess", ""),
        key("US", "Unassigned Location (From Diamond Princess)", ""),
        key("Mainland China", "Hubei", ""),
        key("China", "Hubei", ""),
        key("Hong Kong", "", ""),
        key("Hong Kong SAR", "", ""),
        key("France", "France", ""),
        key("France", "", ""),
        key("France", "French Polynesia", ""),
        key("Korea, South", "", ""),
        key("Republic of Korea", "", ""),
        key("Others", "Diamond Princess cruise ship", ""),
        key("Cruise Ship", "Diamond Princess", ""),
        key("Germany", "Bavaria", ""),
        key("Atlantis", "", ""),
        key("Taiwan*", "", ""),
        key("UK", "", ""),
    ]
}
