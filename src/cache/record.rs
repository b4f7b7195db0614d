//! In-memory cache mapping and freshness rules

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cached DRM status for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// DRM status as returned by the answer backend
    pub drm: String,

    /// When the status was resolved
    pub timestamp: DateTime<Utc>,
}

/// Result of checking a title against the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness<'a> {
    /// Record exists and is younger than the TTL
    Fresh(&'a str),
    /// Record exists but its age is at least the TTL; the stale value is kept
    Expired(&'a str),
    /// No record for this title
    Missing,
}

/// Mapping from app ID to cached record.
///
/// Serialized transparently as `{ "<appid>": { "drm": ..., "timestamp": ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrmCache {
    records: BTreeMap<String, CacheRecord>,
}

impl DrmCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw record for an app ID, fresh or not
    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&CacheRecord> {
        self.records.get(id)
    }

    /// Classify the record for `id`.
    ///
    /// A record is fresh only when `now - timestamp < ttl`; a record exactly
    /// `ttl` old is expired.
    pub fn freshness(&self, id: &str, now: DateTime<Utc>, ttl: Duration) -> Freshness<'_> {
        match self.records.get(id) {
            None => Freshness::Missing,
            Some(record) if now - record.timestamp < ttl => Freshness::Fresh(&record.drm),
            Some(record) => Freshness::Expired(&record.drm),
        }
    }

    /// Cached DRM status for `id` if it is still fresh
    pub fn lookup(&self, id: &str, now: DateTime<Utc>, ttl: Duration) -> Option<&str> {
        match self.freshness(id, now, ttl) {
            Freshness::Fresh(drm) => Some(drm),
            Freshness::Expired(_) | Freshness::Missing => None,
        }
    }

    /// Insert or overwrite the record for `id`
    pub fn put(&mut self, id: &str, drm: impl Into<String>, now: DateTime<Utc>) {
        self.records.insert(
            id.to_string(),
            CacheRecord {
                drm: drm.into(),
                timestamp: now,
            },
        );
    }

    /// Summarize record ages relative to `now`
    pub fn stats(&self, now: DateTime<Utc>, ttl: Duration) -> CacheStats {
        let fresh = self
            .records
            .values()
            .filter(|r| now - r.timestamp < ttl)
            .count();

        CacheStats {
            total_entries: self.records.len(),
            fresh_entries: fresh,
            expired_entries: self.records.len() - fresh,
            oldest_entry: self.records.values().map(|r| r.timestamp).min(),
            newest_entry: self.records.values().map(|r| r.timestamp).max(),
        }
    }
}

/// Statistics about cache state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub expired_entries: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl() -> Duration {
        Duration::days(30)
    }

    #[test]
    fn test_missing_record() {
        let cache = DrmCache::new();
        let now = Utc::now();
        assert_eq!(cache.freshness("440", now, ttl()), Freshness::Missing);
        assert_eq!(cache.lookup("440", now, ttl()), None);
    }

    #[test]
    fn test_fresh_record_hits() {
        let mut cache = DrmCache::new();
        let now = Utc::now();
        cache.put("440", "Steam DRM", now - Duration::days(29));

        assert_eq!(cache.lookup("440", now, ttl()), Some("Steam DRM"));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let mut cache = DrmCache::new();
        let now = Utc::now();
        cache.put("440", "Denuvo", now - ttl());

        assert_eq!(cache.lookup("440", now, ttl()), None);
        assert_eq!(
            cache.freshness("440", now, ttl()),
            Freshness::Expired("Denuvo")
        );
    }

    #[test]
    fn test_just_inside_boundary_is_fresh() {
        let mut cache = DrmCache::new();
        let now = Utc::now();
        cache.put("440", "Denuvo", now - ttl() + Duration::seconds(1));

        assert_eq!(cache.lookup("440", now, ttl()), Some("Denuvo"));
    }

    #[test]
    fn test_put_overwrites() {
        let mut cache = DrmCache::new();
        let earlier = Utc::now() - Duration::days(40);
        let now = Utc::now();
        cache.put("10", "Denuvo", earlier);
        cache.put("10", "DRM-Free", now);

        assert_eq!(cache.len(), 1);
        let record = cache.get("10").unwrap();
        assert_eq!(record.drm, "DRM-Free");
        assert_eq!(record.timestamp, now);
    }

    #[test]
    fn test_serialized_shape() {
        let mut cache = DrmCache::new();
        let ts = DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        cache.put("440", "Steam DRM", ts);

        let value = serde_json::to_value(&cache).unwrap();
        assert_eq!(value["440"]["drm"], "Steam DRM");
        assert!(value["440"]["timestamp"]
            .as_str()
            .unwrap()
            .starts_with("2025-01-02T03:04:05"));
    }

    #[test]
    fn test_reads_offset_timestamps() {
        let json = r#"{"570": {"drm": "DRM-Free", "timestamp": "2025-06-01T10:00:00.123456+00:00"}}"#;
        let cache: DrmCache = serde_json::from_str(json).unwrap();
        assert_eq!(cache.get("570").unwrap().drm, "DRM-Free");
    }

    #[test]
    fn test_stats() {
        let mut cache = DrmCache::new();
        let now = Utc::now();
        cache.put("1", "Denuvo", now - Duration::days(1));
        cache.put("2", "DRM-Free", now - Duration::days(31));
        cache.put("3", "Steam DRM", now);

        let stats = cache.stats(now, ttl());
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.fresh_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.oldest_entry, Some(now - Duration::days(31)));
        assert_eq!(stats.newest_entry, Some(now));
    }
}
