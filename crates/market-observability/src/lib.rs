//! Structured logging for the storefront pipeline.
//!
//! Every crate logs through `tracing` macros; binaries call
//! [`LoggingSetup::init`] once to install a subscriber.
//!
//! This crate provides:
//! - `LogFormat` - JSON or human-readable output
//! - `LogLevel` - Minimum level, mapped to an `EnvFilter` directive
//! - `LoggingSetup` - Subscriber builder

mod logging;

pub use logging::*;
