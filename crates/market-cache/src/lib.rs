//! In-memory read cache for banner and category data.
//!
//! This crate provides:
//! - `CacheKey` - Entity family plus serialized request options
//! - `TtlCache` - Expiring entries with stale fallback and family invalidation
//! - `CacheStatus` - Outcome of a lookup

mod key;
mod store;

pub use key::*;
pub use store::*;
