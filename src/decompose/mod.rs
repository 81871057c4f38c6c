//! Input shape classification and raw component extraction.
//!
//! Classification is an ordered, data-driven table of shape rules; the first
//! extractor that produces components wins. Decomposition is a pure function
//! of the input and of which segmentation providers are installed.

mod shapes;

use std::sync::Arc;
use std::sync::Once;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::locale;
use crate::models::{ParsedComponents, QueryMode, RawQuery};
use crate::normalize;
use crate::segment::AddressSegmenter;

static CAPABILITY_WARNING: Once = Once::new();

/// One entry of the shape classification table.
struct ShapeRule {
    name: &'static str,
    extract: fn(&Decomposer, &str) -> Option<ParsedComponents>,
}

/// Classification order is significant: first match wins.
const SHAPE_RULES: &[ShapeRule] = &[
    ShapeRule {
        name: "town-county-country",
        extract: shapes::town_county_country,
    },
    ShapeRule {
        name: "town-county-state-country",
        extract: shapes::town_county_state_country,
    },
    ShapeRule {
        name: "street-address",
        extract: shapes::street_address,
    },
    ShapeRule {
        name: "comma-heuristic",
        extract: shapes::comma_heuristic,
    },
];

/// Classifies input strings and extracts raw address components.
pub struct Decomposer {
    segmenters: Vec<Arc<dyn AddressSegmenter>>,
    /// `<number> <street> <type> <city> <state/prov>`, no commas.
    street_full: Regex,
    /// `<number> <street...>` line.
    street_line: Regex,
    /// `<city> <2-letter state>` tail.
    city_state: Regex,
}

impl Decomposer {
    pub fn new(segmenters: Vec<Arc<dyn AddressSegmenter>>) -> Self {
        let types = normalize::street_type_pattern();
        let states: Vec<&str> = locale::state_codes().collect();
        let states = states.join("|");

        let street_full = Regex::new(&format!(
            r"(?i)^(\d+)\s+(.+?\b(?:{types})\b\.?(?:\s+(?:NE|NW|SE|SW|N|S|E|W))?)\s+(.+?)[\s,]+({states})\.?$"
        ))
        .unwrap();
        let street_line = Regex::new(r"^(\d+)\s+(.+)$").unwrap();
        let city_state = Regex::new(r"^(.+?)[\s,]+([A-Za-z]{2})\.?$").unwrap();

        Self {
            segmenters,
            street_full,
            street_line,
            city_state,
        }
    }

    /// Extract raw components from a single-location query.
    ///
    /// Fails with `ShapeUnrecognized` only when no rule matches; the public
    /// API maps that to an empty result, not an error.
    pub fn decompose(&self, raw: &RawQuery) -> Result<ParsedComponents> {
        // Scan-text input is windowed by the orchestrator first; whole
        // documents never come through here.
        if raw.mode() != QueryMode::Single {
            return Err(Error::InvalidUsage(
                "scan-text input must go through scan()".into(),
            ));
        }
        let text = raw.text().trim();
        for rule in SHAPE_RULES {
            if let Some(components) = (rule.extract)(self, text) {
                debug!("Input matched shape '{}': {}", rule.name, text);
                return Ok(components);
            }
        }
        Err(Error::ShapeUnrecognized)
    }

    /// Whether the text is a complete `<number> <street> <type> <city> <ST>`
    /// address with no commas. Used by the scan-mode scorer.
    pub fn matches_full_address(&self, text: &str) -> bool {
        self.street_full.is_match(text.trim().trim_end_matches(['.', ',']))
    }

    /// Whether the text ends in a known state/province code.
    pub fn has_state_suffix(&self, text: &str) -> bool {
        text.trim()
            .trim_end_matches(['.', ','])
            .rsplit(|c: char| c.is_whitespace() || c == ',')
            .next()
            .map_or(false, locale::is_state_code)
    }

    /// Whether any token names a street type.
    pub fn has_street_type(&self, text: &str) -> bool {
        text.split(|c: char| c.is_whitespace() || c == ',')
            .any(normalize::is_street_type)
    }

    fn run_segmenters(&self, text: &str, country_code: &str) -> Option<ParsedComponents> {
        if self.segmenters.is_empty() {
            CAPABILITY_WARNING.call_once(|| {
                warn!("No address-segmentation capability installed; using pattern extraction");
            });
            return None;
        }
        for segmenter in &self.segmenters {
            match segmenter.parse(text, Some(country_code)) {
                Ok(segmented) => {
                    debug!("Segmenter '{}' accepted input", segmenter.name());
                    return Some(segmented.into_components());
                }
                Err(err) => {
                    debug!("Segmenter '{}' declined input: {}", segmenter.name(), err);
                }
            }
        }
        None
    }
}
