//! In-memory per-channel source cache.
//!
//! Sources are created lazily on first activity and evicted after an idle
//! interval. Nothing is persisted; the cache starts empty on every run.

mod cache;

pub use cache::SourceCache;
