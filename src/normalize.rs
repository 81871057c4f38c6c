//! Component canonicalization: case folding, punctuation and whitespace
//! cleanup, street-type abbreviation, and name-to-code resolution.

use tracing::warn;

use crate::locale;
use crate::models::{NormalizedComponents, ParsedComponents};

/// Street-type synonym table, long form to canonical abbreviation.
///
/// One direction only; abbreviations are never expanded back, which keeps
/// normalization a fixed point after a single application.
const STREET_SYNONYMS: &[(&str, &str)] = &[
    ("STREET", "ST"),
    ("AVENUE", "AVE"),
    ("ROAD", "RD"),
    ("DRIVE", "DR"),
    ("COURT", "CT"),
    ("CIRCLE", "CIR"),
    ("PARKWAY", "PKWY"),
    ("LANE", "LN"),
    ("PLACE", "PL"),
    ("GARDENS", "GRDNS"),
    ("CREEK", "CRK"),
    ("CENTER", "CTR"),
    ("RIDGE", "RDG"),
    ("FORT", "FT"),
];

/// Street-type tokens that are already canonical.
const CANONICAL_TYPES: &[&str] = &[
    "ST", "AVE", "RD", "DR", "CT", "CIR", "PKWY", "LN", "PL", "GRDNS", "CRK", "CTR", "RDG", "FT",
    "SPRING", "PIKE", "BLVD",
];

/// Whether a token names a street type, in long or abbreviated form.
pub fn is_street_type(token: &str) -> bool {
    let token = token.trim_end_matches('.').to_uppercase();
    CANONICAL_TYPES.contains(&token.as_str())
        || STREET_SYNONYMS.iter().any(|(long, _)| *long == token)
}

/// Regex alternation of every street-type token, long forms first.
pub fn street_type_pattern() -> String {
    let mut tokens: Vec<&str> = STREET_SYNONYMS.iter().map(|(long, _)| *long).collect();
    tokens.extend(CANONICAL_TYPES);
    tokens.join("|")
}

fn fold_text(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':'));
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn strip_leading_zeros(token: &str) -> &str {
    if token.starts_with('0') {
        let stripped = token.trim_start_matches('0');
        if stripped.chars().next().map_or(false, |c| c.is_ascii_digit()) {
            return stripped;
        }
    }
    token
}

/// Canonicalize a street string: fold case, strip leading zeros from numeric
/// tokens (`04th` -> `4TH`), abbreviate street types.
pub fn canonicalize_street(street: &str) -> String {
    fold_text(street)
        .split_whitespace()
        .map(|token| {
            let token = token.trim_end_matches('.');
            let token = strip_leading_zeros(token);
            STREET_SYNONYMS
                .iter()
                .find(|(long, _)| *long == token)
                .map(|(_, abbr)| *abbr)
                .unwrap_or(token)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Produce a fresh normalized copy of the extracted components.
pub fn normalize(components: &ParsedComponents) -> NormalizedComponents {
    let state = components.state.as_ref().map(|state| {
        let folded = fold_text(state);
        if folded.len() <= 2 {
            folded
        } else if let Some(code) = locale::state_code(&folded) {
            code.to_string()
        } else {
            // Not a failure; the resolver copes with unknown subdivisions.
            warn!("Unresolvable state/province name: {}", state);
            folded
        }
    });

    let (country, country_code) = match &components.country {
        Some(name) => match locale::country_code(name) {
            Some(code) => {
                let display = locale::country_display_name(code)
                    .map(str::to_uppercase)
                    .unwrap_or_else(|| code.to_string());
                (Some(display), Some(code.to_string()))
            }
            None => (Some(fold_text(name)), None),
        },
        None => (None, None),
    };

    NormalizedComponents {
        house_number: components
            .house_number
            .as_ref()
            .map(|h| strip_leading_zeros(&fold_text(h)).to_string()),
        street: components.street.as_ref().map(|s| canonicalize_street(s)),
        city: components.city.as_ref().map(|c| fold_text(c)),
        county: components.county.as_ref().map(|c| fold_text(c)),
        state,
        country,
        country_code,
    }
}
