//! Core types shared by every storefront crate.
//!
//! This crate provides:
//! - `StorefrontConfig` - Service URLs and credentials, from env or file
//! - `Clock` - Injectable time source (`SystemClock`, `ManualClock`)
//! - `endpoints` - Paths of the remote REST surface

mod clock;
mod config;
pub mod endpoints;

pub use clock::*;
pub use config::*;
