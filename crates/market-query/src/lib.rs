//! Query cache for storefront data.
//!
//! This crate provides:
//! - `QueryClient` - Keyed results with stale time, GC time, retries and background refetch
//! - `MutationEffects` - Invalidations and optimistic patches applied after a mutation
//! - `banner_keys` / `product_keys` - Key factories shared by reads and invalidations
//! - `StorefrontQueries` - The storefront services bound to the cache with their timings

mod client;
mod key;
pub mod keys;
mod options;
mod storefront;

pub use client::*;
pub use key::*;
pub use keys::{banner_keys, product_keys, vehicle_types_key};
pub use options::*;
pub use storefront::*;
