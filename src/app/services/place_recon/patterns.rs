//! Early-feed US province patterns
//!
//! Until the feed introduced the `Admin2` column in late March 2020, US
//! counties and cities were reported as provinces such as
//! `"King County, WA"` or `"Chicago, IL"`. This module rewrites those into
//! `(United States, <state>, <county>)` so they merge with later county rows.

use crate::app::models::PlaceKey;
use regex::Regex;
use std::sync::LazyLock;

/// Canonical country name the pattern applies to
pub const UNITED_STATES: &str = "United States";

static COUNTY_PROVINCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^,]+?)(?: County| Parish)?,\s*(?P<state>[A-Z]{2})(?:\s*\(From Diamond Princess\))?$")
        .expect("county province pattern is valid")
});

/// US state and territory postal abbreviations
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("PR", "Puerto Rico"),
    ("GU", "Guam"),
    ("VI", "Virgin Islands"),
];

/// Full state name for a postal abbreviation
pub fn state_name(abbreviation: &str) -> Option<&'static str> {
    STATE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == abbreviation)
        .map(|(_, name)| *name)
}

/// Whether a province string has the early-feed `"<name>, <ST>"` form
pub fn is_county_province(province: &str) -> bool {
    expand_province(province).is_some()
}

/// Rewrite an early-feed US county province into a county-level key
///
/// Returns `None` when the key is not a US province-level key in the
/// `"<name>, <ST>"` form or the abbreviation is unknown.
pub fn expand_county_province(key: &PlaceKey) -> Option<PlaceKey> {
    if key.country != UNITED_STATES || key.is_district() {
        return None;
    }
    let (state, county) = expand_province(&key.province)?;
    Some(PlaceKey::new(UNITED_STATES, state, county))
}

fn expand_province(province: &str) -> Option<(&'static str, String)> {
    let captures = COUNTY_PROVINCE.captures(province.trim())?;
    let state = state_name(captures.name("state")?.as_str())?;
    let county = captures.name("name")?.as_str().trim().to_string();
    Some((state, county))
}
