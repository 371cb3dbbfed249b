//! Environment check command.

use anyhow::{bail, Result};
use market_sdk::market_core::EnvironmentReport;

use crate::context::Context;
use crate::output::format_duration;

/// Report which settings are set and fail when a required one is missing.
pub fn run(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let report: EnvironmentReport = config.validate();

    ctx.output.header("Storefront configuration");
    ctx.output.kv("API", or_unset(&config.api_base_url));
    ctx.output.kv("Listings", config.listing_base());
    ctx.output.kv("Vehicle types", config.cars_base());
    ctx.output.kv("Images", config.image_base());
    ctx.output.kv("Cache TTL", &format_duration(config.cache_ttl_secs));

    if ctx.output.is_json() {
        ctx.output.json(&report);
    }

    for missing in &report.warnings {
        ctx.output.warn(&format!("Optional setting not set: {}", missing));
    }

    if !report.is_valid {
        for missing in &report.missing {
            ctx.output.list_item(missing);
        }
        bail!("Missing required environment variables: {}", report.missing.join(", "));
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
