//! Administrative hierarchy codes and gazetteer tiers.

use serde::{Deserialize, Serialize};

/// Gazetteer tier a lookup runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Countries and their first-level subdivisions.
    Country,
    /// Counties and districts.
    County,
    /// Cities, towns and other populated places.
    City,
}

impl Tier {
    /// All tiers in hierarchical order, most general first.
    pub fn all() -> &'static [Tier] {
        &[Tier::Country, Tier::County, Tier::City]
    }

    /// Table file stem for the flat-file backend.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Tier::Country => "country",
            Tier::County => "county",
            Tier::City => "city",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Dot-separated administrative hierarchy code, e.g. `US.MD` or `GB.ENG.KEN`.
///
/// Segments run most-general first: ISO country code, then zero or more
/// subdivision codes. Any prefix up to a dot boundary is itself a valid code
/// one level up in the gazetteer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminCode(String);

impl AdminCode {
    /// Build from an already-formed code string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the code's segments, most general first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The ISO country segment.
    pub fn country(&self) -> &str {
        self.segments().next().unwrap_or("")
    }

    /// Append a subdivision segment, producing a narrower code.
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment.to_uppercase()))
    }

    /// Whether `self` sits at or below `prefix` in the hierarchy.
    pub fn is_within(&self, prefix: &AdminCode) -> bool {
        self.0 == prefix.0 || self.0.starts_with(&format!("{}.", prefix.0))
    }

    /// Number of leading segments shared with a country/state context.
    ///
    /// This is the tie-break score for ambiguous name matches: a county code
    /// `US.MD.KEN` scores 2 against country `US` + state `MD`, while
    /// `US.VA.KEN` scores 1. Ties are left to stable gazetteer order.
    pub fn prefix_score(&self, country: Option<&str>, state: Option<&str>) -> usize {
        let mut segments = self.segments();
        let mut score = 0;
        if let (Some(want), Some(got)) = (country, segments.next()) {
            if got.eq_ignore_ascii_case(want) {
                score += 1;
            } else {
                return 0;
            }
        }
        if let (Some(want), Some(got)) = (state, segments.next()) {
            if got.eq_ignore_ascii_case(want) {
                score += 1;
            }
        }
        score
    }
}

impl std::fmt::Display for AdminCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_and_country() {
        let code = AdminCode::new("GB.ENG.KEN");
        assert_eq!(code.country(), "GB");
        assert_eq!(code.segments().count(), 3);
    }

    #[test]
    fn test_child_uppercases() {
        let code = AdminCode::new("US").child("md");
        assert_eq!(code.as_str(), "US.MD");
    }

    #[test]
    fn test_is_within() {
        let country = AdminCode::new("US");
        let county = AdminCode::new("US.MD.KEN");
        assert!(county.is_within(&country));
        assert!(county.is_within(&county));
        // US.M is not a dot-boundary prefix of US.MD.KEN
        assert!(!county.is_within(&AdminCode::new("US.M")));
    }

    #[test]
    fn test_prefix_score() {
        let md = AdminCode::new("US.MD.KEN");
        let va = AdminCode::new("US.VA.KEN");
        assert_eq!(md.prefix_score(Some("US"), Some("MD")), 2);
        assert_eq!(va.prefix_score(Some("US"), Some("MD")), 1);
        assert_eq!(va.prefix_score(Some("GB"), None), 0);
    }
}
