//! Administrative code resolution.
//!
//! Turns normalized components into a dot-separated hierarchy code by
//! probing the gazetteer, with an explicit prefix-scoring tie-break for
//! names that recur across states and countries.

use tracing::debug;

use crate::error::Result;
use crate::gazetteer::{Gazetteer, PlaceRecord};
use crate::locale;
use crate::models::{AdminCode, NormalizedComponents, Tier};

/// Outcome of code resolution.
///
/// Resolution is best-effort: when nothing narrower than the country is
/// found, the country-level code is returned with `narrowed` unset and the
/// orchestrator lowers candidate confidence accordingly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: AdminCode,
    pub narrowed: bool,
}

/// Score all rows matching a name and pick the best prefix match.
///
/// Maximum prefix score wins; ties keep the first row in gazetteer order.
/// Rows from a different country (score 0 with a known country) never win.
fn best_match<'a>(
    rows: &'a [PlaceRecord],
    country: Option<&str>,
    state: Option<&str>,
) -> Option<&'a PlaceRecord> {
    let mut best: Option<(&PlaceRecord, usize)> = None;
    for row in rows {
        let score = row.admin_code.prefix_score(country, state);
        if country.is_some() && score == 0 {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((row, score));
        }
    }
    best.map(|(row, _)| row)
}

/// Resolve normalized components to an administrative code.
///
/// Returns `None` only when not even a country can be established; the
/// orchestrator then falls back to unscoped searches.
pub async fn resolve(
    gazetteer: &dyn Gazetteer,
    components: &NormalizedComponents,
) -> Result<Option<Resolution>> {
    let state = components.state.as_deref();

    // Country from the normalizer, or inferred from a state/province code.
    let country = match &components.country_code {
        Some(code) => Some(code.clone()),
        None => state
            .filter(|s| locale::is_state_code(s))
            .and_then(locale::state_country)
            .map(str::to_string),
    };
    let Some(country) = country else {
        return Ok(None);
    };
    let base = AdminCode::new(&country);
    let state_appended = state
        .filter(|s| s.len() == 2 && locale::is_state_code(s))
        .map(|s| Resolution {
            code: base.child(s),
            narrowed: true,
        });

    // With no county to narrow by, a 2-letter state code appends directly.
    let probe = components.county.as_deref().or(state.filter(|s| s.len() > 2));
    let Some(name) = probe else {
        return Ok(Some(state_appended.unwrap_or(Resolution {
            code: base,
            narrowed: false,
        })));
    };

    // Probe the county tier, then country-tier subdivisions (US states used
    // as counties, UK unitary authorities). The state hint participates in
    // the prefix score, so recurring county names land in the right state.
    let county_rows = gazetteer.lookup_by_name(Tier::County, name).await?;
    if let Some(row) = best_match(&county_rows, Some(country.as_str()), state) {
        debug!("County '{}' resolved to {}", name, row.admin_code);
        return Ok(Some(Resolution {
            code: row.admin_code.clone(),
            narrowed: true,
        }));
    }

    let country_rows = gazetteer.lookup_by_name(Tier::Country, name).await?;
    if let Some(row) = best_match(&country_rows, Some(country.as_str()), state) {
        debug!("Subdivision '{}' resolved to {}", name, row.admin_code);
        return Ok(Some(Resolution {
            code: row.admin_code.clone(),
            narrowed: true,
        }));
    }

    Ok(Some(state_appended.unwrap_or(Resolution {
        code: base,
        narrowed: false,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::FlatFileGazetteer;
    use crate::models::ParsedComponents;
    use crate::normalize;

    fn gazetteer() -> FlatFileGazetteer {
        let mut g = FlatFileGazetteer::new();
        for (name, code) in [
            ("Kent", "US.MD.KEN"),
            ("Kent", "US.VA.KEN"),
            ("Kent", "GB.ENG.KEN"),
            ("Montgomery", "US.MD.MON"),
        ] {
            g.insert(
                Tier::County,
                PlaceRecord {
                    name: name.into(),
                    admin_code: AdminCode::new(code),
                    latitude: 0.0,
                    longitude: 0.0,
                },
            );
        }
        g.insert(
            Tier::Country,
            PlaceRecord {
                name: "Maryland".into(),
                admin_code: AdminCode::new("US.MD"),
                latitude: 39.0,
                longitude: -76.7,
            },
        );
        g
    }

    fn normalized(county: Option<&str>, state: Option<&str>, country: Option<&str>) -> NormalizedComponents {
        normalize::normalize(&ParsedComponents {
            county: county.map(str::to_string),
            state: state.map(str::to_string),
            country: country.map(str::to_string),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_state_code_appends_directly() {
        let resolution = resolve(&gazetteer(), &normalized(None, Some("MD"), Some("USA")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.code.as_str(), "US.MD");
        assert!(resolution.narrowed);
    }

    #[tokio::test]
    async fn test_state_hint_breaks_county_tie() {
        // Kent exists in MD, VA and GB; the state hint must pick MD.
        let resolution = resolve(&gazetteer(), &normalized(Some("Kent"), Some("MD"), Some("USA")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.code.as_str(), "US.MD.KEN");

        let resolution = resolve(&gazetteer(), &normalized(Some("Kent"), Some("VA"), Some("USA")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.code.as_str(), "US.VA.KEN");
    }

    #[tokio::test]
    async fn test_county_tie_without_state_keeps_gazetteer_order() {
        let resolution = resolve(&gazetteer(), &normalized(Some("Kent"), None, Some("USA")))
            .await
            .unwrap()
            .unwrap();
        // Both US rows score equally; the first in gazetteer order wins.
        assert_eq!(resolution.code.as_str(), "US.MD.KEN");
    }

    #[tokio::test]
    async fn test_uk_county() {
        let resolution = resolve(&gazetteer(), &normalized(Some("Kent"), None, Some("UK")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.code.as_str(), "GB.ENG.KEN");
        assert!(resolution.narrowed);
    }

    #[tokio::test]
    async fn test_state_name_as_subdivision_fallback() {
        let resolution = resolve(
            &gazetteer(),
            &normalized(Some("Maryland"), None, Some("USA")),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(resolution.code.as_str(), "US.MD");
    }

    #[tokio::test]
    async fn test_country_only_degrades() {
        let resolution = resolve(&gazetteer(), &normalized(Some("Nowhere"), None, Some("USA")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.code.as_str(), "US");
        assert!(!resolution.narrowed);
    }

    #[tokio::test]
    async fn test_no_country_is_unresolved() {
        let resolution = resolve(&gazetteer(), &normalized(Some("Kent"), None, None))
            .await
            .unwrap();
        assert!(resolution.is_none());
    }
}
