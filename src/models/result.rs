//! Candidate queries and resolved location results.

use serde::{Deserialize, Serialize};

use super::AdminCode;

/// One prioritized lookup attempt produced by the orchestrator.
///
/// Candidates are tried in generation order, most specific first; equal
/// confidence keeps the earlier-generated candidate ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    /// Concatenated normalized search text.
    pub key: String,
    /// Administrative scope the match must fall within, when known.
    pub scope: Option<AdminCode>,
    /// Heuristic confidence in [0, 1] assigned to a hit on this candidate.
    pub confidence: f64,
}

/// A fully resolved location.
///
/// Either fully populated or absent; the engine never returns a partially
/// constructed result, and keeps no reference once it is handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Resolved administrative hierarchy code.
    pub admin_code: AdminCode,
    /// Echo of the normalized location string that matched.
    pub location: String,
    /// Confidence in [0, 1] carried over from the matching candidate.
    pub confidence: f64,
    /// City-level display name merged in from the gazetteer row, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LocationResult {
    /// Whether two results point at the same gazetteer row.
    ///
    /// Used by the listing API to drop duplicates while keeping the
    /// higher-confidence occurrence.
    pub fn same_place(&self, other: &LocationResult) -> bool {
        self.admin_code == other.admin_code
            && self.latitude == other.latitude
            && self.longitude == other.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_place_ignores_confidence() {
        let a = LocationResult {
            latitude: 51.336,
            longitude: 1.416,
            admin_code: AdminCode::new("GB.ENG.KEN"),
            location: "RAMSGATE, KENT".into(),
            confidence: 0.8,
            city: Some("Ramsgate".into()),
        };
        let mut b = a.clone();
        b.confidence = 0.5;
        assert!(a.same_place(&b));
    }
}
