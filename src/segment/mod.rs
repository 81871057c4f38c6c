//! Pluggable address-segmentation capability.
//!
//! National address grammars (libpostal-style parsers) are consumed as
//! optional providers injected at engine construction time and tried in
//! priority order. Absence of any provider degrades to pattern-based
//! extraction; it never fails the pipeline.

use crate::models::ParsedComponents;

/// Best-effort structured decomposition of a raw address string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedAddress {
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    /// State, province, county or other sub-country unit.
    pub subcountry: Option<String>,
    pub country: Option<String>,
}

impl SegmentedAddress {
    /// Fold into the pipeline's component model.
    ///
    /// The sub-country unit lands in `state` when it looks like a
    /// state/province, otherwise in `county`; the resolver sorts out the
    /// rest.
    pub fn into_components(self) -> ParsedComponents {
        let (state, county) = match self.subcountry {
            Some(unit) if crate::locale::is_state_code(&unit) || crate::locale::state_code(&unit).is_some() => {
                (Some(unit), None)
            }
            other => (None, other),
        };
        ParsedComponents {
            house_number: self.house_number,
            street: self.street,
            city: self.city,
            county,
            state,
            country: self.country,
        }
    }
}

/// Why a provider could not segment an input.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// The provider does not understand this input.
    #[error("input not segmentable")]
    Unparseable,
    /// The provider itself failed.
    #[error("segmentation provider failed: {0}")]
    Provider(String),
}

/// A national address-segmentation provider.
///
/// Implementations are pure with respect to the engine: given a raw string
/// and an optional ISO country hint they either return a best-effort
/// decomposition or fail, and the engine moves on.
pub trait AddressSegmenter: Send + Sync {
    /// Provider name, for diagnostics.
    fn name(&self) -> &str;

    fn parse(
        &self,
        text: &str,
        country_hint: Option<&str>,
    ) -> Result<SegmentedAddress, SegmentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcountry_routing() {
        let state = SegmentedAddress {
            city: Some("Washington".into()),
            subcountry: Some("DC".into()),
            ..Default::default()
        };
        let components = state.into_components();
        assert_eq!(components.state.as_deref(), Some("DC"));
        assert!(components.county.is_none());

        let county = SegmentedAddress {
            city: Some("Ramsgate".into()),
            subcountry: Some("Kent".into()),
            ..Default::default()
        };
        let components = county.into_components();
        assert_eq!(components.county.as_deref(), Some("Kent"));
        assert!(components.state.is_none());
    }
}
