//! Alder - address normalization and hierarchical gazetteer resolution.
//!
//! Resolves free-form place descriptions into structured geographic records
//! by classifying the input's shape, canonicalizing its components, deriving
//! administrative codes, and issuing prioritized candidate lookups against a
//! layered gazetteer.

pub mod cache;
pub mod config;
pub mod decompose;
pub mod engine;
pub mod error;
pub mod gazetteer;
pub mod locale;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod segment;

pub use config::{EngineConfig, ScanConfidence};
pub use engine::Geocoder;
pub use error::{Error, Result};
pub use models::{AdminCode, LocationResult, ParsedComponents, QueryMode, RawQuery, Tier};
