//! Local DRM cache
//!
//! A single JSON file maps Steam app IDs to the last resolved DRM status and
//! the time it was resolved. Records expire lazily: freshness is decided at
//! read time against a TTL, nothing is evicted in the background.
//!
//! The file is loaded at the start of a run and written back in full at the
//! end. Two runs executing at the same time do not coordinate, so the last one
//! to save wins and the other's updates are lost.

pub mod record;
pub mod store;

/// Default number of days a DRM status stays fresh
pub const DEFAULT_TTL_DAYS: u32 = 30;

pub use record::{DrmCache, Freshness};
pub use store::CacheStore;
