//! Subscriber setup.

use std::fmt;
use std::str::FromStr;

use market_core::LoggingConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// Unknown log format name.
    #[error("unknown log format: {0} (expected `json` or `human`)")]
    UnknownFormat(String),

    /// Filter directive did not parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable format for local runs.
    Human,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "pretty" | "text" => Ok(Self::Human),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Human => write!(f, "human"),
        }
    }
}

/// Builder for the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct LoggingSetup {
    format: LogFormat,
    min_level: LogLevel,
    filter: Option<String>,
}

impl Default for LoggingSetup {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            min_level: LogLevel::Info,
            filter: None,
        }
    }
}

impl LoggingSetup {
    /// Create a setup with JSON output at `info`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a setup from the `[logging]` config section.
    pub fn from_config(config: &LoggingConfig) -> Result<Self, ObservabilityError> {
        let format = config.format.parse()?;
        Ok(Self::new()
            .with_format(format)
            .with_filter(config.filter.clone()))
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the minimum level (ignored when a filter directive is set).
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set an explicit `EnvFilter` directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The configured format.
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Directive string the filter is built from.
    pub fn directive(&self) -> String {
        match &self.filter {
            Some(filter) => filter.clone(),
            None => format!("{},hyper=warn,reqwest=warn", self.min_level.as_directive()),
        }
    }

    /// Build the `EnvFilter`.
    pub fn build_filter(&self) -> Result<EnvFilter, ObservabilityError> {
        EnvFilter::try_new(self.directive())
            .map_err(|e| ObservabilityError::InvalidFilter(e.to_string()))
    }

    /// Install the subscriber globally.
    pub fn init(self) -> Result<(), ObservabilityError> {
        let filter = self.build_filter()?;

        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            LogFormat::Human => tracing_subscriber::fmt()
                .compact()
                .with_target(false)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };

        result.map_err(|e| ObservabilityError::Install(e.to_string()))
    }
}
