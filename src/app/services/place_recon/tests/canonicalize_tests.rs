//! Tests for key canonicalisation

use super::{builtin_recon, key, sample_raw_keys};
use crate::app::services::place_recon::{PlaceRecon, RuleSet};

#[test]
fn test_exact_rename_applies() {
    let mut recon = builtin_recon();

    assert_eq!(
        recon.canonicalize(&key("Hong Kong", "", "")),
        Some(key("China", "Hong Kong", ""))
    );
    assert_eq!(
        recon.canonicalize(&key("France", "France", "")),
        Some(key("France", "", ""))
    );
    assert_eq!(
        recon.canonicalize(&key("Others", "Diamond Princess cruise ship", "")),
        Some(key("Diamond Princess", "", ""))
    );
}

#[test]
fn test_country_alias_applies() {
    let mut recon = builtin_recon();

    assert_eq!(
        recon.canonicalize(&key("Mainland China", "Hubei", "")),
        Some(key("China", "Hubei", ""))
    );
    assert_eq!(
        recon.canonicalize(&key("US", "Washington", "King")),
        Some(key("United States", "Washington", "King"))
    );
    assert_eq!(
        recon.canonicalize(&key("Korea, South", "", "")),
        recon.canonicalize(&key("Republic of Korea", "", ""))
    );
}

#[test]
fn test_drop_list_discards() {
    let mut recon = builtin_recon();

    assert_eq!(recon.canonicalize(&key("Canada", "Grand Princess", "")), None);
    assert_eq!(
        recon.canonicalize(&key("US", "Unassigned Location (From Diamond Princess)", "")),
        None
    );
    assert_eq!(recon.stats().dropped, 2);
}

#[test]
fn test_county_pattern_expands_after_alias() {
    let mut recon = builtin_recon();

    assert_eq!(
        recon.canonicalize(&key("US", "King County, WA", "")),
        Some(key("United States", "Washington", "King"))
    );
    assert_eq!(
        recon.canonicalize(&key("US", "Travis, CA (From Diamond Princess)", "")),
        Some(key("United States", "California", "Travis"))
    );
    assert_eq!(recon.stats().expanded, 2);
}

#[test]
fn test_french_polynesia_stays_a_province_of_france() {
    let mut recon = builtin_recon();

    assert_eq!(
        recon.canonicalize(&key("France", "French Polynesia", "")),
        Some(key("France", "French Polynesia", ""))
    );
    assert_eq!(
        recon.canonicalize(&key("French Polynesia", "", "")),
        Some(key("France", "French Polynesia", ""))
    );
    assert!(!recon.rules().is_known_country("French Polynesia"));
    assert!(recon.unrecognized_countries().is_empty());
}

#[test]
fn test_canonicalize_is_idempotent() {
    let mut recon = builtin_recon();

    for raw in sample_raw_keys() {
        if let Some(canonical) = recon.canonicalize(&raw) {
            assert_eq!(
                recon.canonicalize(&canonical),
                Some(canonical.clone()),
                "canonical key {} from {} changed on second pass",
                canonical,
                raw
            );
        }
    }
}

#[test]
fn test_every_rename_target_is_a_fixed_point() {
    let mut recon = builtin_recon();
    let targets: Vec<_> = recon.rules().renames().values().cloned().collect();

    for target in targets {
        assert_eq!(recon.canonicalize(&target), Some(target.clone()));
    }
}

#[test]
fn test_unused_renames_shrink_as_rules_fire() {
    let mut recon = builtin_recon();
    let before = recon.unused_renames().len();
    assert_eq!(before, recon.rules().renames().len());

    recon.canonicalize(&key("Hong Kong", "", ""));
    recon.canonicalize(&key("Hong Kong", "", ""));

    let after = recon.unused_renames();
    assert_eq!(after.len(), before - 1);
    assert!(!after.iter().any(|r| r.starts_with("Hong Kong ---  --- ")));
}

#[test]
fn test_unrecognized_countries_are_recorded_once() {
    let mut recon = builtin_recon();

    assert_eq!(
        recon.canonicalize(&key("Atlantis", "", "")),
        Some(key("Atlantis", "", ""))
    );
    recon.canonicalize(&key("Atlantis", "Coast", ""));
    recon.canonicalize(&key("Germany", "", ""));

    assert_eq!(recon.unrecognized_countries(), vec!["Atlantis".to_string()]);
}

#[test]
fn test_unused_aliases_reported() {
    let mut recon = builtin_recon();
    recon.canonicalize(&key("US", "", ""));

    let unused = recon.unused_aliases();
    assert!(!unused.contains(&"US".to_string()));
    assert!(unused.contains(&"Mainland China".to_string()));
}

#[test]
fn test_county_pattern_can_be_disabled() {
    let rules = RuleSet::from_toml_str("disable_us_county_pattern = true").unwrap();
    let mut recon = PlaceRecon::new(rules);

    assert_eq!(
        recon.canonicalize(&key("US", "King County, WA", "")),
        Some(key("United States", "King County, WA", ""))
    );
}
