//! Content-addressed result cache with time-based expiry.
//!
//! Keys are a fixed-length digest of the normalized query; entries hold the
//! serialized result and expire lazily on read. This is the only shared
//! mutable structure in the engine.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use hashbrown::HashMap;
use xxhash_rust::xxh64::xxh64;

use crate::error::Result;
use crate::models::LocationResult;

/// Digest length in hex characters. An engine constant, not caller-visible
/// through the API; xxh64 is stable and well-distributed, which is all the
/// key needs to be.
const DIGEST_LEN: usize = 16;

/// Default entry lifetime: one week.
pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Derive the cache digest for a normalized query key.
///
/// The input is the separator-free concatenation of all known components;
/// it is upper-cased here so both feeding paths agree.
pub fn digest(normalized_key: &str) -> String {
    let hash = xxh64(normalized_key.to_uppercase().as_bytes(), 0);
    let mut hex = format!("{hash:016x}");
    hex.truncate(DIGEST_LEN);
    hex
}

#[derive(Debug, Clone)]
struct CacheEntry {
    serialized: String,
    inserted_at: DateTime<Utc>,
    ttl: Duration,
}

/// Concurrent result cache.
///
/// Writes are atomic per key under the lock; racing writers on the same key
/// overwrite each other (last write wins) but a reader never observes a
/// partially written value.
#[derive(Debug)]
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a digest, treating entries past their TTL as absent.
    pub fn get(&self, digest: &str) -> Result<Option<LocationResult>> {
        self.get_at(digest, Utc::now())
    }

    fn get_at(&self, digest: &str, now: DateTime<Utc>) -> Result<Option<LocationResult>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(digest) {
            Some(entry) if now - entry.inserted_at < entry.ttl => {
                Ok(Some(serde_json::from_str(&entry.serialized)?))
            }
            // Expired entries are left in place; the next successful write
            // for this key replaces them.
            _ => Ok(None),
        }
    }

    /// Store a result under its digest.
    pub fn put(&self, digest: &str, result: &LocationResult) -> Result<()> {
        self.put_at(digest, result, Utc::now())
    }

    fn put_at(&self, digest: &str, result: &LocationResult, now: DateTime<Utc>) -> Result<()> {
        let serialized = serde_json::to_string(result)?;
        let entry = CacheEntry {
            serialized,
            inserted_at: now,
            ttl: self.ttl,
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(digest.to_string(), entry);
        Ok(())
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminCode;

    fn result() -> LocationResult {
        LocationResult {
            latitude: 51.336,
            longitude: 1.416,
            admin_code: AdminCode::new("GB.ENG.KEN"),
            location: "RAMSGATE, KENT, GREAT BRITAIN".into(),
            confidence: 0.8,
            city: Some("Ramsgate".into()),
        }
    }

    #[test]
    fn test_digest_is_stable_and_fixed_length() {
        let a = digest("RAMSGATEKENTGREAT BRITAIN");
        let b = digest("ramsgatekentgreat britain");
        assert_eq!(a, b);
        assert_eq!(a.len(), DIGEST_LEN);
        assert_ne!(a, digest("something else"));
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let cache = ResultCache::default();
        let key = digest("RAMSGATEKENTGREAT BRITAIN");
        cache.put(&key, &result()).unwrap();
        let cached = cache.get(&key).unwrap().unwrap();
        assert_eq!(cached, result());
    }

    #[test]
    fn test_expired_entry_reads_as_miss() {
        let cache = ResultCache::new(Duration::seconds(60));
        let key = digest("RAMSGATEKENTGREAT BRITAIN");
        let inserted = Utc::now();
        cache.put_at(&key, &result(), inserted).unwrap();

        let before_expiry = inserted + Duration::seconds(59);
        assert!(cache.get_at(&key, before_expiry).unwrap().is_some());

        let after_expiry = inserted + Duration::seconds(61);
        assert!(cache.get_at(&key, after_expiry).unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = ResultCache::default();
        let key = digest("key");
        let mut second = result();
        second.confidence = 0.5;
        cache.put(&key, &result()).unwrap();
        cache.put(&key, &second).unwrap();
        assert_eq!(cache.get(&key).unwrap().unwrap().confidence, 0.5);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        use std::sync::Arc;

        let cache = Arc::new(ResultCache::default());
        let key = digest("shared");
        cache.put(&key, &result()).unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    cache.put(&key, &result()).unwrap();
                    let cached = cache.get(&key).unwrap().unwrap();
                    // Never a partially written value.
                    assert_eq!(cached.admin_code.as_str(), "GB.ENG.KEN");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
