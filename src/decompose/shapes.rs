//! Shape extractors for the classification table.
//!
//! Each extractor is pure: given the input text it either produces raw
//! components or declines, and the table moves on to the next rule.

use super::Decomposer;
use crate::locale;
use crate::models::ParsedComponents;

/// `Town, County, Country` — British-style input, two or three digit-free
/// comma segments ending in a recognized country.
pub(super) fn town_county_country(_d: &Decomposer, text: &str) -> Option<ParsedComponents> {
    let segments = split_commas(text);
    if !(2..=3).contains(&segments.len()) {
        return None;
    }
    if segments
        .iter()
        .any(|s| s.chars().any(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let country = segments.last()?;
    locale::country_code(country)?;

    let town = expand_saint(&segments[0]);
    let mut county = None;
    let mut state = None;
    if segments.len() == 3 {
        let middle = &segments[1];
        // A state/province in the middle slot makes this `City, State, Country`.
        if locale::is_state_code(middle) || locale::state_code(middle).is_some() {
            state = Some(middle.clone());
        } else {
            county = Some(middle.clone());
        }
    }

    Some(ParsedComponents {
        city: Some(town),
        county,
        state,
        country: Some(country.clone()),
        ..Default::default()
    })
}

/// `Town, County, State, Country` — North American four-segment input.
pub(super) fn town_county_state_country(_d: &Decomposer, text: &str) -> Option<ParsedComponents> {
    let segments = split_commas(text);
    if segments.len() != 4 {
        return None;
    }
    let country = segments.last()?;
    if !matches!(locale::country_code(country), Some("US") | Some("CA")) {
        return None;
    }

    Some(ParsedComponents {
        city: Some(segments[0].clone()),
        county: Some(segments[1].clone()),
        state: Some(segments[2].clone()),
        country: Some(country.clone()),
        ..Default::default()
    })
}

/// Structured street-address parsing: segmentation providers keyed by a
/// detected country suffix, then anchored pattern extraction.
pub(super) fn street_address(d: &Decomposer, text: &str) -> Option<ParsedComponents> {
    let (body, country) = split_country_suffix(text);

    if let Some(code) = country.as_deref().and_then(locale::country_code) {
        if let Some(components) = d.run_segmenters(&body, code) {
            return Some(with_country(components, country));
        }
    }

    extract_with_patterns(d, &body).map(|components| with_country(components, country))
}

/// Last-resort heuristics: first comma segment is the city, the remainder is
/// state and/or country.
pub(super) fn comma_heuristic(d: &Decomposer, text: &str) -> Option<ParsedComponents> {
    let (body, country) = split_country_suffix(text);
    let segments = split_commas(&body);

    match segments.len() {
        0 => None,
        1 => {
            // No commas left: peel a trailing state code off the segment.
            if let Some(caps) = d.city_state.captures(&segments[0]) {
                let code = &caps[2];
                if locale::is_state_code(code) {
                    return Some(ParsedComponents {
                        city: Some(caps[1].trim().to_string()),
                        state: Some(code.to_string()),
                        country,
                        ..Default::default()
                    });
                }
            }
            // A bare name only qualifies when a country suffix anchored it.
            country.as_ref()?;
            Some(ParsedComponents {
                city: Some(segments[0].clone()),
                country,
                ..Default::default()
            })
        }
        _ => {
            let mut state = None;
            let mut county = None;
            for segment in &segments[1..] {
                if state.is_none()
                    && (locale::is_state_code(segment) || locale::state_code(segment).is_some())
                {
                    state = Some(segment.clone());
                } else if county.is_none() {
                    county = Some(segment.clone());
                }
            }
            if state.is_none() && county.is_none() && country.is_none() {
                return None;
            }
            Some(ParsedComponents {
                city: Some(segments[0].clone()),
                county,
                state,
                country,
                ..Default::default()
            })
        }
    }
}

/// Anchored regex extraction for `<number> <street> <type> <city> <state>`
/// shapes, with and without comma separators.
fn extract_with_patterns(d: &Decomposer, body: &str) -> Option<ParsedComponents> {
    let segments = split_commas(body);
    match segments.len() {
        0 => None,
        1 => {
            let caps = d.street_full.captures(&segments[0])?;
            Some(ParsedComponents {
                house_number: Some(caps[1].to_string()),
                street: Some(caps[2].trim().to_string()),
                city: Some(caps[3].trim().to_string()),
                state: Some(caps[4].to_string()),
                ..Default::default()
            })
        }
        _ => {
            let caps = d.street_line.captures(&segments[0])?;
            let house = caps[1].to_string();
            let street = caps[2].trim().to_string();

            let mut city = None;
            let mut state = None;
            if segments.len() == 2 {
                match d.city_state.captures(&segments[1]) {
                    Some(caps) if locale::is_state_code(&caps[2]) => {
                        city = Some(caps[1].trim().to_string());
                        state = Some(caps[2].to_string());
                    }
                    _ => city = Some(segments[1].clone()),
                }
            } else {
                city = Some(segments[1].clone());
                state = Some(segments[2].clone());
            }

            Some(ParsedComponents {
                house_number: Some(house),
                street: Some(street),
                city,
                state,
                ..Default::default()
            })
        }
    }
}

fn with_country(components: ParsedComponents, country: Option<String>) -> ParsedComponents {
    if components.country.is_some() {
        return components;
    }
    ParsedComponents {
        country,
        ..components
    }
}

/// Split on commas, trimming each segment and dropping empties.
fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Expand a leading `St` / `St.` to `Saint`.
fn expand_saint(town: &str) -> String {
    for prefix in ["St. ", "St "] {
        if let Some(rest) = town.strip_prefix(prefix) {
            return format!("Saint {rest}");
        }
    }
    town.to_string()
}

/// Detect and strip a trailing country suffix, comma-separated or not.
fn split_country_suffix(text: &str) -> (String, Option<String>) {
    let segments = split_commas(text);
    if segments.len() >= 2 {
        if let Some(last) = segments.last() {
            if locale::country_code(last).is_some() {
                let body = segments[..segments.len() - 1].join(", ");
                return (body, Some(last.clone()));
            }
        }
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() >= 2 {
        let max_take = 4.min(tokens.len() - 1);
        for take in (1..=max_take).rev() {
            let suffix = tokens[tokens.len() - take..].join(" ");
            if locale::country_code(&suffix).is_some() {
                let body = tokens[..tokens.len() - take].join(" ");
                return (body, Some(suffix));
            }
        }
    }

    (text.to_string(), None)
}
