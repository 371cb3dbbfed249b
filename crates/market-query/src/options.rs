//! Per-query settings and results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use market_data::RetryPolicy;
use serde::Serialize;

/// How long a query stays fresh and cached, and how it retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    /// Age after which cached data is refetched in the background.
    pub stale_time: Duration,
    /// Idle time after which an entry may be collected.
    pub gc_time: Duration,
    /// Retry policy for fetches.
    pub retry: RetryPolicy,
    /// Disabled queries never fetch.
    pub enabled: bool,
    /// Fetch even when the cache holds fresh data.
    pub force_fetch: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
            retry: RetryPolicy::default(),
            enabled: true,
            force_fetch: false,
        }
    }
}

impl QueryOptions {
    /// Default options: always stale, five-minute GC, three retries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stale time.
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Set the GC time.
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable the query.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Bypass fresh cached data when `force` is set.
    pub fn forced(mut self, force: bool) -> Self {
        self.force_fetch = force;
        self
    }
}

/// Lifecycle of a query entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Never fetched, or disabled.
    Idle,
    /// Last fetch succeeded.
    Success,
    /// Last fetch failed after every retry.
    Error,
}

/// Snapshot of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    /// Latest successful data. Kept across later failures and refetches.
    pub data: Option<T>,
    pub status: QueryStatus,
    /// Message of the last failure, while in the error state.
    pub error: Option<String>,
    /// A fetch is running.
    pub is_fetching: bool,
    /// When `data` was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryResult<T> {
    /// Result of a query that has nothing and is not fetching.
    pub fn idle() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            is_fetching: false,
            updated_at: None,
        }
    }

    /// Successful result holding `data`.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            status: QueryStatus::Success,
            error: None,
            is_fetching: false,
            updated_at: None,
        }
    }

    /// Failed result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            status: QueryStatus::Error,
            error: Some(message.into()),
            is_fetching: false,
            updated_at: None,
        }
    }

    /// No data yet and a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_fetching
    }

    /// True in the error state.
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// True in the success state.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// The data, or `T::default()`.
    pub fn data_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.data.clone().unwrap_or_default()
    }

    /// Map the data, keeping the state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            data: self.data.map(f),
            status: self.status,
            error: self.error,
            is_fetching: self.is_fetching,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = QueryOptions::new();
        assert_eq!(options.stale_time, Duration::ZERO);
        assert_eq!(options.retry.max_retries, 3);
        assert!(options.enabled);
        assert!(!options.force_fetch);
        assert!(!options.enabled(false).enabled);
        assert!(options.forced(true).force_fetch);
    }

    #[test]
    fn test_loading_means_no_data_yet() {
        let mut result = QueryResult::<Vec<u32>>::idle();
        result.is_fetching = true;
        assert!(result.is_loading());

        let mut refetching = QueryResult::success(vec![1]);
        refetching.is_fetching = true;
        assert!(!refetching.is_loading());
    }

    #[test]
    fn test_map_keeps_state() {
        let mapped = QueryResult::failure("boom").map(|v: Vec<u32>| v.len());
        assert!(mapped.is_error());
        assert_eq!(mapped.error.as_deref(), Some("boom"));
    }
}
