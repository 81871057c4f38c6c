//! Query input and extracted address components.

use serde::{Deserialize, Serialize};

/// How an input string should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// A single structured location description.
    Single,
    /// Arbitrary text that may contain zero or more addresses.
    ScanText,
}

/// The original input, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuery {
    text: String,
    mode: QueryMode,
}

impl RawQuery {
    /// Wrap a single-location query.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: QueryMode::Single,
        }
    }

    /// Wrap free text for scan mode.
    pub fn scan_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: QueryMode::ScanText,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }
}

/// Raw components extracted by the decomposer.
///
/// Fields are trimmed strings or absent; partially populated values are
/// normal. Never mutated after creation — the normalizer produces a fresh
/// `NormalizedComponents` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ParsedComponents {
    /// Whether any component was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.house_number.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.county.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }
}

/// Canonicalized components, ready for code resolution and lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 code when the country name resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl NormalizedComponents {
    /// Concatenate all known components with no separators.
    ///
    /// This string feeds both the cache digest and the street-level address
    /// table key, so the two paths always agree.
    pub fn concat_key(&self) -> String {
        let mut key = String::new();
        for part in [
            &self.house_number,
            &self.street,
            &self.city,
            &self.county,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .flatten()
        {
            key.push_str(part);
        }
        key
    }

    /// Composite key for the street-level address table.
    ///
    /// Requires at least a street and a city; the house number and state are
    /// included when present. Concatenation matches `concat_key` so the
    /// address path and the cache digest share one normalization.
    pub fn address_key(&self) -> Option<String> {
        let street = self.street.as_ref()?;
        let city = self.city.as_ref()?;
        let mut key = String::new();
        if let Some(house) = &self.house_number {
            key.push_str(house);
        }
        key.push_str(street);
        key.push_str(city);
        if let Some(state) = &self.state {
            key.push_str(state);
        }
        Some(key)
    }

    /// Human-readable echo of the normalized location, for results.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        match (&self.house_number, &self.street) {
            (Some(house), Some(street)) => parts.push(format!("{} {}", house, street)),
            (None, Some(street)) => parts.push(street.clone()),
            _ => {}
        }
        for part in [&self.city, &self.county, &self.state, &self.country]
            .into_iter()
            .flatten()
        {
            parts.push(part.clone());
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_key_skips_missing() {
        let components = NormalizedComponents {
            city: Some("RAMSGATE".into()),
            county: Some("KENT".into()),
            country: Some("GREAT BRITAIN".into()),
            ..Default::default()
        };
        assert_eq!(components.concat_key(), "RAMSGATEKENTGREAT BRITAIN");
    }

    #[test]
    fn test_display_joins_street_line() {
        let components = NormalizedComponents {
            house_number: Some("1600".into()),
            street: Some("PENNSYLVANIA AVE NW".into()),
            city: Some("WASHINGTON".into()),
            state: Some("DC".into()),
            ..Default::default()
        };
        assert_eq!(
            components.display(),
            "1600 PENNSYLVANIA AVE NW, WASHINGTON, DC"
        );
    }
}
