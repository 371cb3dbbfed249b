//! CLI execution context.

use anyhow::{Context as _, Result};
use market_sdk::{LogFormat, LoggingSetup, Storefront, StorefrontConfig, StorefrontQueries};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Services bound to a query cache.
    pub queries: StorefrontQueries,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load config from `config_path`, or the environment without one, and
    /// install logging.
    pub fn load(
        config_path: Option<&str>,
        log_format: Option<LogFormat>,
        output: Output,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => StorefrontConfig::load(path)?,
            None => Self::find_config().unwrap_or_else(StorefrontConfig::from_env),
        };

        let mut logging = LoggingSetup::from_config(&config.logging)
            .context("Invalid logging settings")?;
        if let Some(format) = log_format {
            logging = logging.with_format(format);
        }
        if output.is_verbose() {
            logging = logging.with_filter("debug,hyper=warn,reqwest=warn");
        }
        logging.init()?;

        let queries = StorefrontQueries::from_services(Storefront::from_config(&config));
        Ok(Self {
            config,
            queries,
            output,
        })
    }

    /// Look for a config file in the working directory.
    fn find_config() -> Option<StorefrontConfig> {
        ["market.toml", ".market.toml", "market.json"]
            .iter()
            .find(|name| std::path::Path::new(name).exists())
            .and_then(|name| StorefrontConfig::load(name).ok())
    }
}
