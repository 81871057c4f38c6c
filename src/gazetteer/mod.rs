//! Read interfaces to the place hierarchy and the street-level address table.
//!
//! The engine only ever consumes these traits; storage lives behind them.
//! A flat-file backend is provided for the query binary and for tests.

mod flatfile;

pub use flatfile::{FlatFileAddressTable, FlatFileGazetteer};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AdminCode, Tier};

/// One row of a gazetteer tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub admin_code: AdminCode,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the street-level address table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Read-only client for the three-tier place hierarchy.
///
/// Name lookups are case-insensitive exact matches and may return several
/// rows; ambiguity is resolved by the hierarchical resolver, not here.
/// Implementations must return rows in a stable order across calls.
#[async_trait]
pub trait Gazetteer: Send + Sync {
    /// All rows in `tier` whose name matches `name`, original order preserved.
    async fn lookup_by_name(&self, tier: Tier, name: &str) -> Result<Vec<PlaceRecord>>;

    /// The row carrying exactly this administrative code, if present.
    async fn lookup_by_code(&self, tier: Tier, code: &AdminCode) -> Result<Option<PlaceRecord>>;
}

/// Read-only client for the street-level address table.
///
/// `key` is the concatenated normalized street/city/state string; the same
/// normalization that feeds the result-cache digest feeds this key.
#[async_trait]
pub trait AddressTable: Send + Sync {
    async fn lookup_by_key(&self, key: &str) -> Result<Option<AddressRecord>>;
}
