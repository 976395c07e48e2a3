//! Canonicalisation rule set
//!
//! A [`RuleSet`] holds the exact-triple renames, the drop list, the country
//! aliases and the recognised country names. The built-in table covers the
//! naming quirks seen in the daily report feed; a TOML rules file can extend
//! or replace it.

use super::patterns;
use crate::app::models::PlaceKey;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

type Triple = (&'static str, &'static str, &'static str);

/// Exact raw triples and the canonical triple they stand for
const BUILTIN_RENAMES: &[(Triple, Triple)] = &[
    (("France", "France", ""), ("France", "", "")),
    (("United Kingdom", "United Kingdom", ""), ("United Kingdom", "", "")),
    (("Netherlands", "Netherlands", ""), ("Netherlands", "", "")),
    (("Denmark", "Denmark", ""), ("Denmark", "", "")),
    (("Hong Kong", "", ""), ("China", "Hong Kong", "")),
    (("Hong Kong SAR", "", ""), ("China", "Hong Kong", "")),
    (("Hong Kong", "Hong Kong", ""), ("China", "Hong Kong", "")),
    (("Macau", "", ""), ("China", "Macau", "")),
    (("Macao SAR", "", ""), ("China", "Macau", "")),
    (("North Ireland", "", ""), ("United Kingdom", "Northern Ireland", "")),
    (("Channel Islands", "", ""), ("United Kingdom", "Channel Islands", "")),
    (("Gibraltar", "", ""), ("United Kingdom", "Gibraltar", "")),
    (("Cayman Islands", "", ""), ("United Kingdom", "Cayman Islands", "")),
    (("Greenland", "", ""), ("Denmark", "Greenland", "")),
    (("Faroe Islands", "", ""), ("Denmark", "Faroe Islands", "")),
    (("French Polynesia", "", ""), ("France", "French Polynesia", "")),
    (("French Guiana", "", ""), ("France", "French Guiana", "")),
    (("Martinique", "", ""), ("France", "Martinique", "")),
    (("Guadeloupe", "", ""), ("France", "Guadeloupe", "")),
    (("Reunion", "", ""), ("France", "Reunion", "")),
    (("Mayotte", "", ""), ("France", "Mayotte", "")),
    (("Aruba", "", ""), ("Netherlands", "Aruba", "")),
    (("Curacao", "", ""), ("Netherlands", "Curacao", "")),
    (("Puerto Rico", "", ""), ("United States", "Puerto Rico", "")),
    (("Guam", "", ""), ("United States", "Guam", "")),
    (("Others", "Diamond Princess cruise ship", ""), ("Diamond Princess", "", "")),
    (("Cruise Ship", "Diamond Princess", ""), ("Diamond Princess", "", "")),
    (("US", "Diamond Princess", ""), ("Diamond Princess", "", "")),
    (("US", "Grand Princess", ""), ("Grand Princess", "", "")),
];

/// Placeholder rows that do not describe a place
const BUILTIN_DROPS: &[Triple] = &[
    ("US", "Unassigned Location (From Diamond Princess)", ""),
    ("US", "Unassigned Location, WA", ""),
    ("Canada", "Diamond Princess", ""),
    ("Canada", "Grand Princess", ""),
    ("Canada", "Repatriated Travellers", ""),
    ("Others", "", ""),
    ("Cruise Ship", "", ""),
];

/// Country-name variants used by the feed and the canonical name
const BUILTIN_COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("Mainland China", "China"),
    ("Korea, South", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("Taiwan*", "Taiwan"),
    ("Taipei and environs", "Taiwan"),
    ("UK", "United Kingdom"),
    ("Iran (Islamic Republic of)", "Iran"),
    ("Russian Federation", "Russia"),
    ("Viet Nam", "Vietnam"),
    ("Republic of Moldova", "Moldova"),
    ("Czech Republic", "Czechia"),
    ("Ivory Coast", "Cote d'Ivoire"),
    ("Bahamas, The", "Bahamas"),
    ("The Bahamas", "Bahamas"),
    ("Gambia, The", "Gambia"),
    ("The Gambia", "Gambia"),
    ("Cape Verde", "Cabo Verde"),
    ("East Timor", "Timor-Leste"),
    ("Vatican City", "Holy See"),
    ("Republic of Ireland", "Ireland"),
    ("Republic of the Congo", "Congo (Brazzaville)"),
    ("occupied Palestinian territory", "West Bank and Gaza"),
    ("Palestine", "West Bank and Gaza"),
    ("Swaziland", "Eswatini"),
    ("Macedonia", "North Macedonia"),
];

/// Canonical country names
const BUILTIN_KNOWN_COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Antigua and Barbuda",
    "Argentina", "Armenia", "Australia", "Austria", "Azerbaijan", "Bahamas", "Bahrain",
    "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin", "Bhutan", "Bolivia",
    "Bosnia and Herzegovina", "Botswana", "Brazil", "Brunei", "Bulgaria", "Burkina Faso",
    "Burma", "Burundi", "Cabo Verde", "Cambodia", "Cameroon", "Canada",
    "Central African Republic", "Chad", "Chile", "China", "Colombia", "Comoros",
    "Congo (Brazzaville)", "Congo (Kinshasa)", "Costa Rica", "Cote d'Ivoire", "Croatia",
    "Cuba", "Cyprus", "Czechia", "Denmark", "Diamond Princess", "Djibouti", "Dominica",
    "Dominican Republic", "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea", "Eritrea",
    "Estonia", "Eswatini", "Ethiopia", "Fiji", "Finland", "France", "Gabon",
    "Gambia", "Georgia", "Germany", "Ghana", "Grand Princess", "Greece", "Grenada",
    "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Holy See", "Honduras",
    "Hungary", "Iceland", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy",
    "Jamaica", "Japan", "Jordan", "Kazakhstan", "Kenya", "Kosovo", "Kuwait", "Kyrgyzstan",
    "Laos", "Latvia", "Lebanon", "Lesotho", "Liberia", "Libya", "Liechtenstein", "Lithuania",
    "Luxembourg", "MS Zaandam", "Madagascar", "Malawi", "Malaysia", "Maldives", "Mali",
    "Malta", "Marshall Islands", "Mauritania", "Mauritius", "Mexico", "Micronesia", "Moldova",
    "Monaco", "Mongolia", "Montenegro", "Morocco", "Mozambique", "Namibia", "Nepal",
    "Netherlands", "New Zealand", "Nicaragua", "Niger", "Nigeria", "North Macedonia",
    "Norway", "Oman", "Pakistan", "Panama", "Papua New Guinea", "Paraguay", "Peru",
    "Philippines", "Poland", "Portugal", "Qatar", "Romania", "Russia", "Rwanda",
    "Saint Kitts and Nevis", "Saint Lucia", "Saint Vincent and the Grenadines", "Samoa",
    "San Marino", "Sao Tome and Principe", "Saudi Arabia", "Senegal", "Serbia", "Seychelles",
    "Sierra Leone", "Singapore", "Slovakia", "Slovenia", "Solomon Islands", "Somalia",
    "South Africa", "South Korea", "South Sudan", "Spain", "Sri Lanka", "Sudan", "Suriname",
    "Sweden", "Switzerland", "Syria", "Taiwan", "Tajikistan", "Tanzania", "Thailand",
    "Timor-Leste", "Togo", "Trinidad and Tobago", "Tunisia", "Turkey", "Uganda", "Ukraine",
    "United Arab Emirates", "United Kingdom", "United States", "Uruguay", "Uzbekistan",
    "Vanuatu", "Venezuela", "Vietnam", "West Bank and Gaza", "Western Sahara", "Yemen",
    "Zambia", "Zimbabwe",
];

/// Rules mapping raw place names from every source onto canonical keys
#[derive(Debug, Clone)]
pub struct RuleSet {
    renames: BTreeMap<PlaceKey, PlaceKey>,
    drops: BTreeSet<PlaceKey>,
    country_aliases: BTreeMap<String, String>,
    known_countries: BTreeSet<String>,
    expand_us_counties: bool,
}

/// A single exact-triple rename as written in a rules file
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRule {
    pub from: PlaceKey,
    pub to: PlaceKey,
}

/// On-disk rules file
///
/// ```toml
/// replace_builtin = false
/// known_countries = ["Myanmar"]
///
/// [[renames]]
/// from = { country = "Kosovo", province = "Kosovo" }
/// to = { country = "Kosovo" }
///
/// [country_aliases]
/// "Burma" = "Myanmar"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleFile {
    /// Start from an empty rule set instead of the built-in table
    pub replace_builtin: bool,
    pub renames: Vec<RenameRule>,
    pub drops: Vec<PlaceKey>,
    pub country_aliases: BTreeMap<String, String>,
    pub known_countries: Vec<String>,
    /// Disable the early-feed `"County, ST"` rewrite
    pub disable_us_county_pattern: bool,
}

impl RuleSet {
    /// Create a validated rule set
    ///
    /// # Errors
    /// Returns `Error::RuleSet` when the rules could map a canonical key to a
    /// different key, which would make canonicalisation non-idempotent.
    pub fn new(
        renames: BTreeMap<PlaceKey, PlaceKey>,
        drops: BTreeSet<PlaceKey>,
        country_aliases: BTreeMap<String, String>,
        known_countries: BTreeSet<String>,
        expand_us_counties: bool,
    ) -> Result<Self> {
        let rules = Self {
            renames,
            drops,
            country_aliases,
            known_countries,
            expand_us_counties,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// The built-in rule table
    pub fn builtin() -> Result<Self> {
        let renames = BUILTIN_RENAMES
            .iter()
            .map(|(from, to)| (PlaceKey::from_parts(*from), PlaceKey::from_parts(*to)))
            .collect();
        let drops = BUILTIN_DROPS.iter().map(|t| PlaceKey::from_parts(*t)).collect();
        let country_aliases = BUILTIN_COUNTRY_ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let known_countries = BUILTIN_KNOWN_COUNTRIES
            .iter()
            .map(|c| c.to_string())
            .collect();

        Self::new(renames, drops, country_aliases, known_countries, true)
    }

    /// Build a rule set from a parsed rules file
    pub fn from_rule_file(file: RuleFile) -> Result<Self> {
        let mut rules = if file.replace_builtin {
            Self {
                renames: BTreeMap::new(),
                drops: BTreeSet::new(),
                country_aliases: BTreeMap::new(),
                known_countries: BTreeSet::new(),
                expand_us_counties: true,
            }
        } else {
            Self::builtin()?
        };

        for rule in file.renames {
            rules.renames.insert(rule.from, rule.to);
        }
        rules.drops.extend(file.drops);
        rules.country_aliases.extend(file.country_aliases);
        rules.known_countries.extend(file.known_countries);
        if file.disable_us_county_pattern {
            rules.expand_us_counties = false;
        }

        rules.validate()?;
        Ok(rules)
    }

    /// Parse a TOML rules document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content)
            .map_err(|e| Error::rule_set(format!("Invalid rules file: {}", e)))?;
        Self::from_rule_file(file)
    }

    /// Load a TOML rules file from disk
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading canonicalisation rules from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read rules file '{}'", path.display()), e)
        })?;
        let rules = Self::from_toml_str(&content)?;
        debug!(
            "Loaded {} renames, {} drops, {} aliases, {} countries",
            rules.renames.len(),
            rules.drops.len(),
            rules.country_aliases.len(),
            rules.known_countries.len()
        );
        Ok(rules)
    }

    pub fn renames(&self) -> &BTreeMap<PlaceKey, PlaceKey> {
        &self.renames
    }

    pub fn drops(&self) -> &BTreeSet<PlaceKey> {
        &self.drops
    }

    pub fn country_aliases(&self) -> &BTreeMap<String, String> {
        &self.country_aliases
    }

    pub fn known_countries(&self) -> &BTreeSet<String> {
        &self.known_countries
    }

    pub fn expands_us_counties(&self) -> bool {
        self.expand_us_counties
    }

    pub fn is_known_country(&self, country: &str) -> bool {
        self.known_countries.contains(country)
    }

    fn validate(&self) -> Result<()> {
        for (from, to) in &self.renames {
            if from == to {
                return Err(Error::rule_set(format!("Rename of {} maps to itself", from)));
            }
            if self.renames.contains_key(to) {
                return Err(Error::rule_set(format!(
                    "Rename target {} (from {}) is itself renamed",
                    to, from
                )));
            }
            if self.drops.contains(to) {
                return Err(Error::rule_set(format!(
                    "Rename target {} (from {}) is also dropped",
                    to, from
                )));
            }
            if self.country_aliases.contains_key(&to.country) {
                return Err(Error::rule_set(format!(
                    "Rename target {} (from {}) uses aliased country '{}'",
                    to, from, to.country
                )));
            }
            if !self.known_countries.contains(&to.country) {
                return Err(Error::rule_set(format!(
                    "Rename target {} (from {}) uses unrecognized country '{}'",
                    to, from, to.country
                )));
            }
            if self.expand_us_counties && patterns::expand_county_province(to).is_some() {
                return Err(Error::rule_set(format!(
                    "Rename target {} (from {}) would be rewritten by the county pattern",
                    to, from
                )));
            }
        }

        for (from, to) in &self.country_aliases {
            if from == to {
                return Err(Error::rule_set(format!(
                    "Country alias '{}' maps to itself",
                    from
                )));
            }
            if self.country_aliases.contains_key(to) {
                return Err(Error::rule_set(format!(
                    "Country alias target '{}' (from '{}') is itself an alias",
                    to, from
                )));
            }
            if !self.known_countries.contains(to) {
                return Err(Error::rule_set(format!(
                    "Country alias target '{}' (from '{}') is not a recognized country",
                    to, from
                )));
            }
        }

        Ok(())
    }
}
