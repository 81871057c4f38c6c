//! Lookup orchestration: candidate generation, cache consultation, and the
//! public resolution API.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::cache::{self, ResultCache};
use crate::config::EngineConfig;
use crate::decompose::Decomposer;
use crate::error::{Error, Result};
use crate::gazetteer::{AddressTable, Gazetteer};
use crate::models::{
    AdminCode, CandidateQuery, LocationResult, NormalizedComponents, RawQuery, Tier,
};
use crate::normalize;
use crate::resolve::{self, Resolution};
use crate::segment::AddressSegmenter;

/// Confidence assigned to a street-level address-table hit.
const CONFIDENCE_ADDRESS: f64 = 0.9;
/// City matched inside the fully resolved administrative scope.
const CONFIDENCE_CITY_SCOPED: f64 = 0.8;
/// City matched inside a country-only scope (resolution degraded).
const CONFIDENCE_CITY_COUNTRY: f64 = 0.7;
/// County name tried as a populated place inside the country scope.
const CONFIDENCE_COUNTY_PLACE: f64 = 0.6;
/// City matched with no administrative scope at all.
const CONFIDENCE_CITY_UNSCOPED: f64 = 0.5;

/// How a candidate is executed against the backends.
#[derive(Debug, Clone, PartialEq)]
enum CandidateKind {
    /// Composite-key probe of the street-level address table.
    Address,
    /// Name probe of the city tier, filtered by the candidate scope.
    Place(String),
}

#[derive(Debug, Clone)]
struct PlannedCandidate {
    query: CandidateQuery,
    kind: CandidateKind,
}

/// The resolution engine.
///
/// Stateless per invocation apart from the result cache; safe to share
/// across concurrent callers.
pub struct Geocoder {
    gazetteer: Arc<dyn Gazetteer>,
    address_table: Option<Arc<dyn AddressTable>>,
    segmenters: Vec<Arc<dyn AddressSegmenter>>,
    decomposer: Decomposer,
    cache: ResultCache,
    config: EngineConfig,
}

impl Geocoder {
    pub fn new(gazetteer: Arc<dyn Gazetteer>) -> Self {
        let config = EngineConfig::default();
        Self {
            gazetteer,
            address_table: None,
            segmenters: Vec::new(),
            decomposer: Decomposer::new(Vec::new()),
            cache: ResultCache::new(Duration::seconds(config.cache_ttl_secs)),
            config,
        }
    }

    /// Attach a street-level address table.
    pub fn with_address_table(mut self, table: Arc<dyn AddressTable>) -> Self {
        self.address_table = Some(table);
        self
    }

    /// Install an address-segmentation provider. Providers are tried in the
    /// order they are added.
    pub fn with_segmenter(mut self, segmenter: Arc<dyn AddressSegmenter>) -> Self {
        self.segmenters.push(segmenter);
        self.decomposer = Decomposer::new(self.segmenters.clone());
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.cache = ResultCache::new(Duration::seconds(config.cache_ttl_secs));
        self.config = config;
        self
    }

    /// Resolve a single location description to its best match.
    pub async fn geocode(&self, location: &str) -> Result<Option<LocationResult>> {
        let raw = validated(location)?;
        self.resolve_single(&raw).await
    }

    /// Resolve a location description to all matches, most confident first.
    pub async fn geocode_all(&self, location: &str) -> Result<Vec<LocationResult>> {
        let raw = validated(location)?;
        let Some((normalized, resolution)) = self.prepare(&raw).await? else {
            return Ok(Vec::new());
        };

        let mut results: Vec<LocationResult> = Vec::new();
        for candidate in self.candidate_plan(&normalized, resolution.as_ref()) {
            for hit in self.execute_all(&candidate, &normalized, resolution.as_ref()).await? {
                if !results.iter().any(|seen| seen.same_place(&hit)) {
                    results.push(hit);
                }
            }
        }
        // Candidates are generated in descending specificity; a stable sort
        // keeps generation order for equal confidence.
        results.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
        Ok(results)
    }

    /// Find every address-like fragment in free text.
    ///
    /// Overlapping windows are all reported; duplicates are deliberately not
    /// collapsed so confidence provenance survives for the caller.
    pub async fn scan(&self, text: &str) -> Result<Vec<LocationResult>> {
        let raw = RawQuery::scan_text(text);
        if raw.text().trim().is_empty() {
            return Err(Error::InvalidUsage("no text supplied".into()));
        }

        let tokens: Vec<&str> = raw
            .text()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= self.config.scan_min_token_len)
            .collect();

        let mut results = Vec::new();
        for start in 0..tokens.len() {
            for width in 1..=3usize {
                let end = start + width;
                if end > tokens.len() {
                    break;
                }
                let window = tokens[start..end].join(" ");
                if let Some(hit) = self.score_window(&window, width).await? {
                    results.push(hit);
                }
            }
        }
        Ok(results)
    }

    /// Reverse geocoding is not provided on the address-table-backed path.
    pub async fn reverse_geocode(&self, _latlng: &str) -> Result<LocationResult> {
        Err(Error::NotSupported(
            "reverse geocoding is not available on this backend",
        ))
    }

    /// Classify one scan window and resolve it if it qualifies.
    async fn score_window(&self, window: &str, width: usize) -> Result<Option<LocationResult>> {
        let scan = &self.config.scan;

        if width == 3 {
            let raw = RawQuery::single(window);
            if let Some(mut hit) = self.resolve_single(&raw).await? {
                hit.confidence = scan.resolved_window;
                return Ok(Some(hit));
            }
        }

        if self.decomposer.matches_full_address(window) {
            let raw = RawQuery::single(window);
            if let Some(mut hit) = self.resolve_single(&raw).await? {
                hit.confidence = scan.street_address;
                return Ok(Some(hit));
            }
        }

        if self.decomposer.has_state_suffix(window) && !self.decomposer.has_street_type(window) {
            let raw = RawQuery::single(window);
            if let Some(mut hit) = self.resolve_single(&raw).await? {
                hit.confidence = scan.state_suffix;
                return Ok(Some(hit));
            }
        }

        if width == 1 {
            let rows = self.gazetteer.lookup_by_name(Tier::City, window).await?;
            if let Some(row) = rows.first() {
                return Ok(Some(LocationResult {
                    latitude: row.latitude,
                    longitude: row.longitude,
                    admin_code: row.admin_code.clone(),
                    location: window.to_uppercase(),
                    confidence: scan.bare,
                    city: Some(row.name.clone()),
                }));
            }
        }

        Ok(None)
    }

    /// Decompose and normalize, mapping an unrecognized shape to "nothing".
    async fn prepare(
        &self,
        raw: &RawQuery,
    ) -> Result<Option<(NormalizedComponents, Option<Resolution>)>> {
        let components = match self.decomposer.decompose(raw) {
            Ok(components) => components,
            Err(Error::ShapeUnrecognized) => return Ok(None),
            Err(err) => return Err(err),
        };
        let normalized = normalize::normalize(&components);
        let resolution = resolve::resolve(self.gazetteer.as_ref(), &normalized).await?;
        Ok(Some((normalized, resolution)))
    }

    /// The single-result pipeline: cache first, then candidates in order.
    async fn resolve_single(&self, raw: &RawQuery) -> Result<Option<LocationResult>> {
        let components = match self.decomposer.decompose(raw) {
            Ok(components) => components,
            Err(Error::ShapeUnrecognized) => return Ok(None),
            Err(err) => return Err(err),
        };
        let normalized = normalize::normalize(&components);

        // The digest depends only on the normalized query, so a repeat
        // lookup never touches the gazetteer at all.
        let digest = cache::digest(&normalized.concat_key());
        if let Some(cached) = self.cache.get(&digest)? {
            debug!("Cache hit for {}", digest);
            return Ok(Some(cached));
        }

        let resolution = resolve::resolve(self.gazetteer.as_ref(), &normalized).await?;
        for candidate in self.candidate_plan(&normalized, resolution.as_ref()) {
            if let Some(hit) = self.execute(&candidate, &normalized, resolution.as_ref()).await? {
                self.cache.put(&digest, &hit)?;
                return Ok(Some(hit));
            }
            debug!("Candidate miss: {:?}", candidate.query.key);
        }
        Ok(None)
    }

    /// Build the ordered candidate list, most specific first.
    ///
    /// Generation order is deterministic for a given set of components and
    /// doubles as the tie-break between equal-confidence candidates.
    fn candidate_plan(
        &self,
        normalized: &NormalizedComponents,
        resolution: Option<&Resolution>,
    ) -> Vec<PlannedCandidate> {
        let mut plan = Vec::new();

        if self.address_table.is_some() && resolution.is_some() {
            if let Some(key) = normalized.address_key() {
                plan.push(PlannedCandidate {
                    query: CandidateQuery {
                        key,
                        scope: resolution.map(|r| r.code.clone()),
                        confidence: CONFIDENCE_ADDRESS,
                    },
                    kind: CandidateKind::Address,
                });
            }
        }

        if let Some(city) = &normalized.city {
            if let Some(resolution) = resolution {
                let scoped_confidence = if resolution.narrowed {
                    CONFIDENCE_CITY_SCOPED
                } else {
                    CONFIDENCE_CITY_COUNTRY
                };
                plan.push(place_candidate(city, Some(&resolution.code), scoped_confidence));

                // A degraded retry at country level when the full scope is
                // narrower than the country.
                let country = AdminCode::new(resolution.code.country());
                if resolution.code != country {
                    plan.push(place_candidate(city, Some(&country), CONFIDENCE_CITY_COUNTRY));
                }
            }
            plan.push(place_candidate(city, None, CONFIDENCE_CITY_UNSCOPED));
        } else if let Some(county) = &normalized.county {
            // No city at all: try the county name as a populated place.
            let country = resolution.map(|r| AdminCode::new(r.code.country()));
            plan.push(place_candidate(
                county,
                country.as_ref(),
                CONFIDENCE_COUNTY_PLACE,
            ));
            plan.push(place_candidate(county, None, CONFIDENCE_CITY_UNSCOPED));
        }

        plan
    }

    /// Execute one candidate, returning its first hit.
    async fn execute(
        &self,
        candidate: &PlannedCandidate,
        normalized: &NormalizedComponents,
        resolution: Option<&Resolution>,
    ) -> Result<Option<LocationResult>> {
        Ok(self
            .execute_all(candidate, normalized, resolution)
            .await?
            .into_iter()
            .next())
    }

    /// Execute one candidate, returning every hit in backend order.
    async fn execute_all(
        &self,
        candidate: &PlannedCandidate,
        normalized: &NormalizedComponents,
        resolution: Option<&Resolution>,
    ) -> Result<Vec<LocationResult>> {
        match &candidate.kind {
            CandidateKind::Address => {
                let Some(table) = &self.address_table else {
                    return Ok(Vec::new());
                };
                let Some(record) = table.lookup_by_key(&candidate.query.key).await? else {
                    return Ok(Vec::new());
                };
                let Some(resolution) = resolution else {
                    return Ok(Vec::new());
                };
                Ok(vec![LocationResult {
                    latitude: record.latitude,
                    longitude: record.longitude,
                    admin_code: resolution.code.clone(),
                    location: normalized.display(),
                    confidence: candidate.query.confidence,
                    city: record.city,
                }])
            }
            CandidateKind::Place(name) => {
                let rows = self.gazetteer.lookup_by_name(Tier::City, name).await?;
                Ok(rows
                    .into_iter()
                    .filter(|row| match &candidate.query.scope {
                        Some(scope) => row.admin_code.is_within(scope),
                        None => true,
                    })
                    .map(|row| LocationResult {
                        latitude: row.latitude,
                        longitude: row.longitude,
                        admin_code: row.admin_code,
                        location: normalized.display(),
                        confidence: candidate.query.confidence,
                        city: Some(row.name),
                    })
                    .collect())
            }
        }
    }
}

fn place_candidate(name: &str, scope: Option<&AdminCode>, confidence: f64) -> PlannedCandidate {
    PlannedCandidate {
        query: CandidateQuery {
            key: name.to_string(),
            scope: scope.cloned(),
            confidence,
        },
        kind: CandidateKind::Place(name.to_string()),
    }
}

fn validated(location: &str) -> Result<RawQuery> {
    if location.trim().is_empty() {
        return Err(Error::InvalidUsage("no location supplied".into()));
    }
    Ok(RawQuery::single(location))
}
