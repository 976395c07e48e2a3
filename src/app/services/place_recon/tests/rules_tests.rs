//! Tests for rule set construction and validation

use super::key;
use crate::app::services::place_recon::RuleSet;
use crate::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use tempfile::NamedTempFile;

fn countries(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_builtin_rules_validate() {
    let rules = RuleSet::builtin().unwrap();

    assert!(rules.is_known_country("United States"));
    assert!(rules.is_known_country("Diamond Princess"));
    assert!(!rules.is_known_country("US"));
    assert!(rules.expands_us_counties());
}

#[test]
fn test_rejects_chained_renames() {
    let mut renames = BTreeMap::new();
    renames.insert(key("A", "", ""), key("B", "", ""));
    renames.insert(key("B", "", ""), key("C", "", ""));

    let result = RuleSet::new(
        renames,
        BTreeSet::new(),
        BTreeMap::new(),
        countries(&["A", "B", "C"]),
        true,
    );
    assert!(matches!(result, Err(Error::RuleSet { .. })));
}

#[test]
fn test_rejects_rename_into_drop() {
    let mut renames = BTreeMap::new();
    renames.insert(key("A", "x", ""), key("A", "", ""));
    let drops = BTreeSet::from([key("A", "", "")]);

    let result = RuleSet::new(renames, drops, BTreeMap::new(), countries(&["A"]), true);
    assert!(matches!(result, Err(Error::RuleSet { .. })));
}

#[test]
fn test_rejects_rename_into_aliased_country() {
    let mut renames = BTreeMap::new();
    renames.insert(key("Macau", "", ""), key("Mainland China", "Macau", ""));
    let aliases = BTreeMap::from([("Mainland China".to_string(), "China".to_string())]);

    let result = RuleSet::new(
        renames,
        BTreeSet::new(),
        aliases,
        countries(&["China", "Mainland China"]),
        true,
    );
    assert!(matches!(result, Err(Error::RuleSet { .. })));
}

#[test]
fn test_rejects_rename_into_county_pattern() {
    let mut renames = BTreeMap::new();
    renames.insert(
        key("US", "Seattle", ""),
        key("United States", "Seattle, WA", ""),
    );

    let result = RuleSet::new(
        renames.clone(),
        BTreeSet::new(),
        BTreeMap::new(),
        countries(&["United States"]),
        true,
    );
    assert!(matches!(result, Err(Error::RuleSet { .. })));

    // Fine once the pattern is switched off
    assert!(RuleSet::new(
        renames,
        BTreeSet::new(),
        BTreeMap::new(),
        countries(&["United States"]),
        false,
    )
    .is_ok());
}

#[test]
fn test_rejects_chained_aliases() {
    let aliases = BTreeMap::from([
        ("UK".to_string(), "Britain".to_string()),
        ("Britain".to_string(), "United Kingdom".to_string()),
    ]);

    let result = RuleSet::new(
        BTreeMap::new(),
        BTreeSet::new(),
        aliases,
        countries(&["Britain", "United Kingdom"]),
        true,
    );
    assert!(matches!(result, Err(Error::RuleSet { .. })));
}

#[test]
fn test_rejects_alias_to_unknown_country() {
    let aliases = BTreeMap::from([("Burma".to_string(), "Myanmar".to_string())]);

    let result = RuleSet::new(
        BTreeMap::new(),
        BTreeSet::new(),
        aliases,
        countries(&["Burma"]),
        true,
    );
    assert!(matches!(result, Err(Error::RuleSet { .. })));
}

#[test]
fn test_rules_file_extends_builtin() {
    let rules = RuleSet::from_toml_str(
        r#"
known_countries = ["Myanmar"]

[[renames]]
from = { country = "Kosovo", province = "Kosovo" }
to = { country = "Kosovo" }

[country_aliases]
"Burma" = "Myanmar"
"#,
    )
    .unwrap();

    assert_eq!(
        rules.renames().get(&key("Kosovo", "Kosovo", "")),
        Some(&key("Kosovo", "", ""))
    );
    assert_eq!(
        rules.country_aliases().get("Burma").map(String::as_str),
        Some("Myanmar")
    );
    // Built-in entries survive
    assert!(rules.country_aliases().contains_key("Mainland China"));
}

#[test]
fn test_rules_file_can_replace_builtin() {
    let rules = RuleSet::from_toml_str(
        r#"
replace_builtin = true
known_countries = ["Atlantis"]
drops = [{ country = "Atlantis", province = "Sunken" }]
"#,
    )
    .unwrap();

    assert!(rules.renames().is_empty());
    assert!(rules.country_aliases().is_empty());
    assert!(rules.drops().contains(&key("Atlantis", "Sunken", "")));
}

#[test]
fn test_invalid_rules_file_is_rejected() {
    let result = RuleSet::from_toml_str("renames = 3");
    assert!(matches!(result, Err(Error::RuleSet { .. })));

    let conflicting = RuleSet::from_toml_str(
        r#"
[country_aliases]
"China" = "Mainland China"
"#,
    );
    assert!(conflicting.is_err());
}

#[test]
fn test_load_rules_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[country_aliases]\n\"Holland\" = \"Netherlands\"").unwrap();

    let rules = RuleSet::load(file.path()).unwrap();
    assert!(rules.country_aliases().contains_key("Holland"));

    let missing = RuleSet::load(std::path::Path::new("/nonexistent/rules.toml"));
    assert!(matches!(missing, Err(Error::Io { .. })));
}
