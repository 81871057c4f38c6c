//! Static locale tables: country and state/province name-to-code mappings.
//!
//! These are fixed reference tables, not gazetteer data. Lookups are linear
//! scans; every table is small enough that indexing would not pay for itself.

/// Country name variants mapped to ISO 3166-1 alpha-2 codes.
///
/// Names are stored upper-cased; `country_code` folds its input before
/// scanning. Variants that national address conventions use as country
/// suffixes ("England", "Scotland") map to the containing ISO code.
const COUNTRIES: &[(&str, &str)] = &[
    ("UNITED STATES", "US"),
    ("UNITED STATES OF AMERICA", "US"),
    ("USA", "US"),
    ("US", "US"),
    ("AMERICA", "US"),
    ("UNITED KINGDOM", "GB"),
    ("UK", "GB"),
    ("GREAT BRITAIN", "GB"),
    ("GB", "GB"),
    ("ENGLAND", "GB"),
    ("SCOTLAND", "GB"),
    ("WALES", "GB"),
    ("NORTHERN IRELAND", "GB"),
    ("CANADA", "CA"),
    ("CA", "CA"),
    ("AUSTRALIA", "AU"),
    ("AU", "AU"),
    ("IRELAND", "IE"),
    ("NEW ZEALAND", "NZ"),
    ("FRANCE", "FR"),
    ("GERMANY", "DE"),
];

/// Display names for resolved country codes.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "Great Britain"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("IE", "Ireland"),
    ("NZ", "New Zealand"),
    ("FR", "France"),
    ("DE", "Germany"),
];

/// US state and district names to USPS codes.
const US_STATES: &[(&str, &str)] = &[
    ("ALABAMA", "AL"),
    ("ALASKA", "AK"),
    ("ARIZONA", "AZ"),
    ("ARKANSAS", "AR"),
    ("CALIFORNIA", "CA"),
    ("COLORADO", "CO"),
    ("CONNECTICUT", "CT"),
    ("DELAWARE", "DE"),
    ("DISTRICT OF COLUMBIA", "DC"),
    ("WASHINGTON DC", "DC"),
    ("FLORIDA", "FL"),
    ("GEORGIA", "GA"),
    ("HAWAII", "HI"),
    ("IDAHO", "ID"),
    ("ILLINOIS", "IL"),
    ("INDIANA", "IN"),
    ("IOWA", "IA"),
    ("KANSAS", "KS"),
    ("KENTUCKY", "KY"),
    ("LOUISIANA", "LA"),
    ("MAINE", "ME"),
    ("MARYLAND", "MD"),
    ("MASSACHUSETTS", "MA"),
    ("MICHIGAN", "MI"),
    ("MINNESOTA", "MN"),
    ("MISSISSIPPI", "MS"),
    ("MISSOURI", "MO"),
    ("MONTANA", "MT"),
    ("NEBRASKA", "NE"),
    ("NEVADA", "NV"),
    ("NEW HAMPSHIRE", "NH"),
    ("NEW JERSEY", "NJ"),
    ("NEW MEXICO", "NM"),
    ("NEW YORK", "NY"),
    ("NORTH CAROLINA", "NC"),
    ("NORTH DAKOTA", "ND"),
    ("OHIO", "OH"),
    ("OKLAHOMA", "OK"),
    ("OREGON", "OR"),
    ("PENNSYLVANIA", "PA"),
    ("RHODE ISLAND", "RI"),
    ("SOUTH CAROLINA", "SC"),
    ("SOUTH DAKOTA", "SD"),
    ("TENNESSEE", "TN"),
    ("TEXAS", "TX"),
    ("UTAH", "UT"),
    ("VERMONT", "VT"),
    ("VIRGINIA", "VA"),
    ("WASHINGTON", "WA"),
    ("WEST VIRGINIA", "WV"),
    ("WISCONSIN", "WI"),
    ("WYOMING", "WY"),
];

/// Canadian province and territory names to postal codes.
const CA_PROVINCES: &[(&str, &str)] = &[
    ("ALBERTA", "AB"),
    ("BRITISH COLUMBIA", "BC"),
    ("MANITOBA", "MB"),
    ("NEW BRUNSWICK", "NB"),
    ("NEWFOUNDLAND AND LABRADOR", "NL"),
    ("NEWFOUNDLAND", "NL"),
    ("NORTHWEST TERRITORIES", "NT"),
    ("NOVA SCOTIA", "NS"),
    ("NUNAVUT", "NU"),
    ("ONTARIO", "ON"),
    ("PRINCE EDWARD ISLAND", "PE"),
    ("QUEBEC", "QC"),
    ("SASKATCHEWAN", "SK"),
    ("YUKON", "YT"),
];

/// Fold a name for table lookup: trim, upper-case, drop a trailing period.
fn fold(name: &str) -> String {
    name.trim().trim_end_matches('.').trim().to_uppercase()
}

/// Resolve a country name or common variant to its ISO code.
pub fn country_code(name: &str) -> Option<&'static str> {
    let key = fold(name);
    COUNTRIES
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, code)| *code)
}

/// Display name for a resolved country code ("GB" -> "Great Britain").
pub fn country_display_name(code: &str) -> Option<&'static str> {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Resolve a US state or Canadian province name to its 2-letter code.
pub fn state_code(name: &str) -> Option<&'static str> {
    let key = fold(name);
    US_STATES
        .iter()
        .chain(CA_PROVINCES.iter())
        .find(|(n, _)| *n == key)
        .map(|(_, code)| *code)
}

/// Whether a token is a known 2-letter state/province code.
pub fn is_state_code(token: &str) -> bool {
    if token.len() != 2 {
        return false;
    }
    let key = token.to_uppercase();
    US_STATES
        .iter()
        .chain(CA_PROVINCES.iter())
        .any(|(_, code)| *code == key)
}

/// All known state/province codes, US first then Canada, in table order.
///
/// Used to build regex alternations for shape classification.
pub fn state_codes() -> impl Iterator<Item = &'static str> {
    US_STATES
        .iter()
        .chain(CA_PROVINCES.iter())
        .map(|(_, code)| *code)
}

/// The country the given state/province code belongs to.
pub fn state_country(code: &str) -> Option<&'static str> {
    let key = code.to_uppercase();
    if US_STATES.iter().any(|(_, c)| *c == key) {
        Some("US")
    } else if CA_PROVINCES.iter().any(|(_, c)| *c == key) {
        Some("CA")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_variants() {
        assert_eq!(country_code("UK"), Some("GB"));
        assert_eq!(country_code("United Kingdom"), Some("GB"));
        assert_eq!(country_code("usa"), Some("US"));
        assert_eq!(country_code(" England "), Some("GB"));
        assert_eq!(country_code("Narnia"), None);
    }

    #[test]
    fn test_state_lookup() {
        assert_eq!(state_code("Maryland"), Some("MD"));
        assert_eq!(state_code("ontario"), Some("ON"));
        assert_eq!(state_code("MD County"), None);
    }

    #[test]
    fn test_state_code_membership() {
        assert!(is_state_code("DC"));
        assert!(is_state_code("bc"));
        assert!(!is_state_code("ZZ"));
        assert!(!is_state_code("MDX"));
    }

    #[test]
    fn test_state_country() {
        assert_eq!(state_country("MD"), Some("US"));
        assert_eq!(state_country("QC"), Some("CA"));
        assert_eq!(state_country("XX"), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(country_display_name("GB"), Some("Great Britain"));
    }
}
