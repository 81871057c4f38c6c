//! Flat-file gazetteer backend.
//!
//! Loads tab-separated tables (optionally gzip-compressed) from a data
//! directory: `country.tsv`, `county.tsv`, `city.tsv` with columns
//! `name  code  lat  lon`, and `address.tsv` with columns
//! `house  street  city  state  lat  lon`. Name indexes preserve file order
//! so ambiguous-name tie-breaks stay stable across runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use hashbrown::HashMap;
use tracing::info;
use walkdir::WalkDir;

use super::{AddressRecord, AddressTable, Gazetteer, PlaceRecord};
use crate::models::{AdminCode, ParsedComponents, Tier};
use crate::normalize;

/// In-memory gazetteer loaded from flat files.
#[derive(Debug, Default)]
pub struct FlatFileGazetteer {
    tiers: HashMap<Tier, TierIndex>,
}

#[derive(Debug, Default)]
struct TierIndex {
    by_name: HashMap<String, Vec<PlaceRecord>>,
    by_code: HashMap<String, PlaceRecord>,
}

impl FlatFileGazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every recognized tier table found under `dir`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut gazetteer = Self::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(tier) = tier_for_path(path) else {
                continue;
            };
            gazetteer
                .load_tier_file(tier, path)
                .with_context(|| format!("Failed to load {} table: {}", tier, path.display()))?;
        }

        let total: usize = gazetteer
            .tiers
            .values()
            .map(|t| t.by_code.len())
            .sum();
        info!("Loaded {} gazetteer rows from {}", total, dir.display());
        Ok(gazetteer)
    }

    fn load_tier_file(&mut self, tier: Tier, path: &Path) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b'\t')
            .from_reader(open_maybe_gz(path)?);

        let headers = reader.headers()?.clone();
        let name_idx = column(&headers, "name")?;
        let code_idx = column(&headers, "code")?;
        let lat_idx = column(&headers, "lat")?;
        let lon_idx = column(&headers, "lon")?;

        for row in reader.records() {
            let row = row?;
            let record = PlaceRecord {
                name: row[name_idx].trim().to_string(),
                admin_code: AdminCode::new(row[code_idx].trim()),
                latitude: row[lat_idx].trim().parse().unwrap_or(0.0),
                longitude: row[lon_idx].trim().parse().unwrap_or(0.0),
            };
            self.insert(tier, record);
        }
        Ok(())
    }

    /// Add a single row; file order is preserved within each name.
    pub fn insert(&mut self, tier: Tier, record: PlaceRecord) {
        let index = self.tiers.entry(tier).or_default();
        index
            .by_code
            .insert(record.admin_code.as_str().to_string(), record.clone());
        index
            .by_name
            .entry(record.name.to_uppercase())
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl Gazetteer for FlatFileGazetteer {
    async fn lookup_by_name(
        &self,
        tier: Tier,
        name: &str,
    ) -> crate::error::Result<Vec<PlaceRecord>> {
        Ok(self
            .tiers
            .get(&tier)
            .and_then(|index| index.by_name.get(&name.trim().to_uppercase()))
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup_by_code(
        &self,
        tier: Tier,
        code: &AdminCode,
    ) -> crate::error::Result<Option<PlaceRecord>> {
        Ok(self
            .tiers
            .get(&tier)
            .and_then(|index| index.by_code.get(code.as_str()))
            .cloned())
    }
}

/// In-memory street-level address table loaded from flat files.
///
/// Keys are derived with the same normalization the engine applies to
/// queries, so the two sides always agree byte-for-byte.
#[derive(Debug, Default)]
pub struct FlatFileAddressTable {
    by_key: HashMap<String, AddressRecord>,
}

impl FlatFileAddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `address.tsv` / `address.tsv.gz` found under `dir`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut table = Self::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && file_stem_matches(path, "address") {
                table
                    .load_file(path)
                    .with_context(|| format!("Failed to load address table: {}", path.display()))?;
            }
        }

        info!("Loaded {} address rows from {}", table.by_key.len(), dir.display());
        Ok(table)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b'\t')
            .from_reader(open_maybe_gz(path)?);

        let headers = reader.headers()?.clone();
        let house_idx = column(&headers, "house")?;
        let street_idx = column(&headers, "street")?;
        let city_idx = column(&headers, "city")?;
        let state_idx = column(&headers, "state")?;
        let lat_idx = column(&headers, "lat")?;
        let lon_idx = column(&headers, "lon")?;

        for row in reader.records() {
            let row = row?;
            let record = AddressRecord {
                latitude: row[lat_idx].trim().parse().unwrap_or(0.0),
                longitude: row[lon_idx].trim().parse().unwrap_or(0.0),
                city: non_empty(&row[city_idx]),
            };
            self.insert(
                non_empty(&row[house_idx]),
                &row[street_idx],
                &row[city_idx],
                non_empty(&row[state_idx]),
                record,
            );
        }
        Ok(())
    }

    /// Add one address row, deriving its composite key via the normalizer.
    pub fn insert(
        &mut self,
        house: Option<String>,
        street: &str,
        city: &str,
        state: Option<String>,
        record: AddressRecord,
    ) {
        let components = ParsedComponents {
            house_number: house,
            street: Some(street.to_string()),
            city: Some(city.to_string()),
            state,
            ..Default::default()
        };
        if let Some(key) = normalize::normalize(&components).address_key() {
            self.by_key.insert(key, record);
        }
    }
}

#[async_trait]
impl AddressTable for FlatFileAddressTable {
    async fn lookup_by_key(&self, key: &str) -> crate::error::Result<Option<AddressRecord>> {
        Ok(self.by_key.get(key).cloned())
    }
}

/// Map a data file path to the tier it populates.
fn tier_for_path(path: &Path) -> Option<Tier> {
    Tier::all()
        .iter()
        .copied()
        .find(|tier| file_stem_matches(path, tier.file_stem()))
}

fn file_stem_matches(path: &Path, stem: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    file_name == format!("{stem}.tsv") || file_name == format!("{stem}.tsv.gz")
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if path.extension().map_or(false, |e| e == "gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("Column '{name}' not found"))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("city.tsv")).unwrap();
        writeln!(file, "name\tcode\tlat\tlon").unwrap();
        writeln!(file, "Ramsgate\tGB.ENG.KEN\t51.336\t1.416").unwrap();
        writeln!(file, "Washington\tUS.DC\t38.895\t-77.036").unwrap();
        drop(file);

        let gazetteer = FlatFileGazetteer::load_from_dir(dir.path()).unwrap();
        let hits = gazetteer.lookup_by_name(Tier::City, "ramsgate").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].admin_code.as_str(), "GB.ENG.KEN");

        let by_code = gazetteer
            .lookup_by_code(Tier::City, &AdminCode::new("US.DC"))
            .await
            .unwrap();
        assert_eq!(by_code.unwrap().name, "Washington");

        let missing = gazetteer.lookup_by_name(Tier::City, "nowhere").await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_ambiguous_names_keep_file_order() {
        let mut gazetteer = FlatFileGazetteer::new();
        for code in ["US.MD.KEN", "US.VA.KEN"] {
            gazetteer.insert(
                Tier::County,
                PlaceRecord {
                    name: "Kent".into(),
                    admin_code: AdminCode::new(code),
                    latitude: 0.0,
                    longitude: 0.0,
                },
            );
        }
        let hits = gazetteer.lookup_by_name(Tier::County, "Kent").await.unwrap();
        let codes: Vec<&str> = hits.iter().map(|r| r.admin_code.as_str()).collect();
        assert_eq!(codes, vec!["US.MD.KEN", "US.VA.KEN"]);
    }

    #[tokio::test]
    async fn test_address_key_round_trip() {
        let mut table = FlatFileAddressTable::new();
        table.insert(
            Some("1600".into()),
            "Pennsylvania Avenue NW",
            "Washington",
            Some("DC".into()),
            AddressRecord {
                latitude: 38.8977,
                longitude: -77.0365,
                city: Some("Washington".into()),
            },
        );

        // The engine derives the same key from a normalized query.
        let components = ParsedComponents {
            house_number: Some("1600".into()),
            street: Some("Pennsylvania Avenue NW".into()),
            city: Some("Washington".into()),
            state: Some("DC".into()),
            ..Default::default()
        };
        let key = normalize::normalize(&components).address_key().unwrap();
        let hit = table.lookup_by_key(&key).await.unwrap();
        assert!(hit.is_some());
    }
}
