//! Country name to ISO 3166 alpha-3 lookup
//!
//! The coverage audit uses this to spot two differently spelled country names
//! that refer to the same country. The lookup sits behind the
//! [`CountryCodeLookup`] trait so a different taxonomy service can be plugged
//! in; the audit treats any lookup failure as advisory.

use crate::Result;
use regex::Regex;
use std::sync::LazyLock;

/// Maps a free-text country name to a standard country code
pub trait CountryCodeLookup: Send + Sync {
    /// Returns `Ok(None)` when the name is not recognised
    fn lookup(&self, name: &str) -> Result<Option<String>>;
}

/// Ordered `(pattern, ISO3)` table; the first matching pattern wins, so
/// narrower patterns (North Korea, South Sudan, Niger/Nigeria) come first.
const COUNTRY_PATTERNS: &[(&str, &str)] = &[
    (r"^afghan", "AFG"),
    (r"^albania", "ALB"),
    (r"^algeria", "DZA"),
    (r"^andorra", "AND"),
    (r"^angola", "AGO"),
    (r"^antigua", "ATG"),
    (r"^argentin", "ARG"),
    (r"^armenia", "ARM"),
    (r"^aruba", "ABW"),
    (r"^australia", "AUS"),
    (r"^austria", "AUT"),
    (r"^azerbaijan", "AZE"),
    (r"bahamas", "BHS"),
    (r"^bahrain", "BHR"),
    (r"^bangladesh", "BGD"),
    (r"^barbados", "BRB"),
    (r"^belarus", "BLR"),
    (r"^belgi", "BEL"),
    (r"^belize", "BLZ"),
    (r"^benin", "BEN"),
    (r"^bhutan", "BTN"),
    (r"^bolivia", "BOL"),
    (r"^bosnia", "BIH"),
    (r"^botswana", "BWA"),
    (r"^brazil", "BRA"),
    (r"^brunei", "BRN"),
    (r"^bulgaria", "BGR"),
    (r"^burkina", "BFA"),
    (r"^(burma|myanmar)", "MMR"),
    (r"^burundi", "BDI"),
    (r"^(cabo|cape) verde", "CPV"),
    (r"^cambodia", "KHM"),
    (r"^cameroon", "CMR"),
    (r"^canada", "CAN"),
    (r"^cayman", "CYM"),
    (r"^central african", "CAF"),
    (r"^chad", "TCD"),
    (r"^chile", "CHL"),
    (r"^(mainland )?china$|^people'?s republic of china", "CHN"),
    (r"^colombia", "COL"),
    (r"^comoros", "COM"),
    (r"congo.*(kinshasa|democratic)|democratic.*congo|^drc$", "COD"),
    (r"congo", "COG"),
    (r"^costa rica", "CRI"),
    (r"ivoire|ivory coast", "CIV"),
    (r"^croatia", "HRV"),
    (r"^cuba", "CUB"),
    (r"^cura[cç]ao", "CUW"),
    (r"^cyprus", "CYP"),
    (r"^czech", "CZE"),
    (r"^denmark", "DNK"),
    (r"^djibouti", "DJI"),
    (r"^dominican", "DOM"),
    (r"^dominica$", "DMA"),
    (r"^ecuador", "ECU"),
    (r"^egypt", "EGY"),
    (r"^el salvador", "SLV"),
    (r"^equatorial guinea", "GNQ"),
    (r"^eritrea", "ERI"),
    (r"^estonia", "EST"),
    (r"^(eswatini|swaziland)", "SWZ"),
    (r"^ethiopia", "ETH"),
    (r"^faroe", "FRO"),
    (r"^fiji", "FJI"),
    (r"^finland", "FIN"),
    (r"^french guiana", "GUF"),
    (r"^french polynesia", "PYF"),
    (r"^france", "FRA"),
    (r"^gabon", "GAB"),
    (r"gambia", "GMB"),
    (r"^georgia", "GEO"),
    (r"^germany", "DEU"),
    (r"^ghana", "GHA"),
    (r"^gibraltar", "GIB"),
    (r"^greece", "GRC"),
    (r"^greenland", "GRL"),
    (r"^grenada", "GRD"),
    (r"^guadeloupe", "GLP"),
    (r"^guam", "GUM"),
    (r"^guatemala", "GTM"),
    (r"^guinea[- ]bissau", "GNB"),
    (r"^guinea", "GIN"),
    (r"^guyana", "GUY"),
    (r"^haiti", "HTI"),
    (r"holy see|vatican", "VAT"),
    (r"^honduras", "HND"),
    (r"^hong kong", "HKG"),
    (r"^hungary", "HUN"),
    (r"^iceland", "ISL"),
    (r"^india", "IND"),
    (r"^indonesia", "IDN"),
    (r"^iran", "IRN"),
    (r"^iraq", "IRQ"),
    (r"^(republic of )?ireland$", "IRL"),
    (r"^israel", "ISR"),
    (r"^italy", "ITA"),
    (r"^jamaica", "JAM"),
    (r"^japan", "JPN"),
    (r"^jordan", "JOR"),
    (r"^kazakh", "KAZ"),
    (r"^kenya", "KEN"),
    (r"korea.*(north|democratic)|democratic.*korea|^north korea", "PRK"),
    (r"korea", "KOR"),
    (r"^kosovo", "XKX"),
    (r"^kuwait", "KWT"),
    (r"^kyrgyz", "KGZ"),
    (r"^lao", "LAO"),
    (r"^latvia", "LVA"),
    (r"^lebanon", "LBN"),
    (r"^lesotho", "LSO"),
    (r"^liberia", "LBR"),
    (r"^libya", "LBY"),
    (r"^liechtenstein", "LIE"),
    (r"^lithuania", "LTU"),
    (r"^luxembourg", "LUX"),
    (r"^maca[ou]", "MAC"),
    (r"^madagascar", "MDG"),
    (r"^malawi", "MWI"),
    (r"^malaysia", "MYS"),
    (r"^maldives", "MDV"),
    (r"^mali$", "MLI"),
    (r"^malta", "MLT"),
    (r"^marshall", "MHL"),
    (r"^martinique", "MTQ"),
    (r"^mauritania", "MRT"),
    (r"^mauritius", "MUS"),
    (r"^mayotte", "MYT"),
    (r"^mexico", "MEX"),
    (r"micronesia", "FSM"),
    (r"moldova", "MDA"),
    (r"^monaco", "MCO"),
    (r"^mongolia", "MNG"),
    (r"^montenegro", "MNE"),
    (r"^morocco", "MAR"),
    (r"^mozambique", "MOZ"),
    (r"^namibia", "NAM"),
    (r"^nepal", "NPL"),
    (r"^(the )?netherlands|^holland", "NLD"),
    (r"^new zealand", "NZL"),
    (r"^nicaragua", "NIC"),
    (r"^nigeria", "NGA"),
    (r"^niger$", "NER"),
    (r"macedonia", "MKD"),
    (r"^norway", "NOR"),
    (r"^oman", "OMN"),
    (r"^pakistan", "PAK"),
    (r"palestin|west bank", "PSE"),
    (r"^panama", "PAN"),
    (r"^papua", "PNG"),
    (r"^paraguay", "PRY"),
    (r"^peru", "PER"),
    (r"^philippines", "PHL"),
    (r"^poland", "POL"),
    (r"^portugal", "PRT"),
    (r"^puerto rico", "PRI"),
    (r"^qatar", "QAT"),
    (r"^r[eé]union", "REU"),
    (r"^romania", "ROU"),
    (r"^russia", "RUS"),
    (r"^rwanda", "RWA"),
    (r"^saint kitts", "KNA"),
    (r"^saint lucia", "LCA"),
    (r"^saint vincent", "VCT"),
    (r"^samoa", "WSM"),
    (r"^san marino", "SMR"),
    (r"^sao tome", "STP"),
    (r"^saudi", "SAU"),
    (r"^senegal", "SEN"),
    (r"^serbia", "SRB"),
    (r"^seychelles", "SYC"),
    (r"^sierra leone", "SLE"),
    (r"^singapore", "SGP"),
    (r"^slovakia", "SVK"),
    (r"^slovenia", "SVN"),
    (r"^solomon", "SLB"),
    (r"^somalia", "SOM"),
    (r"^south africa", "ZAF"),
    (r"^south sudan", "SSD"),
    (r"^spain", "ESP"),
    (r"^sri lanka", "LKA"),
    (r"^sudan", "SDN"),
    (r"^suriname", "SUR"),
    (r"^sweden", "SWE"),
    (r"^switzerland", "CHE"),
    (r"^syria", "SYR"),
    (r"^taiwan|^taipei", "TWN"),
    (r"^tajik", "TJK"),
    (r"^tanzania", "TZA"),
    (r"^thailand", "THA"),
    (r"timor", "TLS"),
    (r"^togo", "TGO"),
    (r"^trinidad", "TTO"),
    (r"^tunisia", "TUN"),
    (r"^turkey", "TUR"),
    (r"^uganda", "UGA"),
    (r"^ukraine", "UKR"),
    (r"^united arab emirates|^uae$", "ARE"),
    (r"^united kingdom|^uk$|^great britain|^north ireland", "GBR"),
    (r"^united states|^us$|^usa$", "USA"),
    (r"^uruguay", "URY"),
    (r"^uzbek", "UZB"),
    (r"^vanuatu", "VUT"),
    (r"^venezuela", "VEN"),
    (r"^vi[eê]t ?nam", "VNM"),
    (r"^western sahara", "ESH"),
    (r"^yemen", "YEM"),
    (r"^zambia", "ZMB"),
    (r"^zimbabwe", "ZWE"),
];

static COMPILED_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    COUNTRY_PATTERNS
        .iter()
        .map(|(pattern, code)| {
            let regex = Regex::new(&format!("(?i){}", pattern))
                .expect("country code patterns are valid");
            (regex, *code)
        })
        .collect()
});

/// Offline lookup driven by an ordered table of name patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCountryCodes;

impl RegexCountryCodes {
    pub fn new() -> Self {
        Self
    }
}

impl CountryCodeLookup for RegexCountryCodes {
    fn lookup(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim().trim_end_matches('*');
        Ok(COMPILED_PATTERNS
            .iter()
            .find(|(regex, _)| regex.is_match(name))
            .map(|(_, code)| code.to_string()))
    }
}
