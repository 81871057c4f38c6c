//! Core data models for the resolution pipeline.

pub mod admin;
pub mod components;
pub mod result;

pub use admin::{AdminCode, Tier};
pub use components::{NormalizedComponents, ParsedComponents, QueryMode, RawQuery};
pub use result::{CandidateQuery, LocationResult};
