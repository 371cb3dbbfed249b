//! The query cache.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use market_core::SharedClock;
use market_data::{retry_with_backoff, RetryPolicy};
use tracing::{debug, warn};

use crate::{QueryKey, QueryOptions, QueryResult, QueryStatus};

type AnyData = Arc<dyn Any + Send + Sync>;

struct Entry {
    data: Option<AnyData>,
    status: QueryStatus,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    last_used: DateTime<Utc>,
    gc_time: Duration,
    invalidated: bool,
    fetching: bool,
    fetched: Arc<Notify>,
}

impl Entry {
    fn new(now: DateTime<Utc>, gc_time: Duration) -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            updated_at: None,
            last_used: now,
            gc_time,
            invalidated: false,
            fetching: false,
            fetched: Arc::new(Notify::new()),
        }
    }

    fn snapshot<T: Clone + 'static>(&self) -> QueryResult<T> {
        QueryResult {
            data: self
                .data
                .as_ref()
                .and_then(|d| d.downcast_ref::<T>())
                .cloned(),
            status: self.status,
            error: self.error.clone(),
            is_fetching: self.fetching,
            updated_at: self.updated_at,
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
        match self.updated_at {
            Some(at) => now.signed_duration_since(at).to_std().unwrap_or(Duration::ZERO) < stale_time,
            None => false,
        }
    }

    fn is_idle(&self, now: DateTime<Utc>) -> bool {
        let idle = now
            .signed_duration_since(self.last_used)
            .to_std()
            .unwrap_or(Duration::ZERO);
        !self.fetching && idle >= self.gc_time
    }
}

/// Clears the fetching flag and wakes waiters if a fetch is dropped
/// before it completes.
struct InFlight<'a> {
    client: &'a QueryClient,
    key: &'a QueryKey,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(entry) = self.client.lock().get_mut(self.key) {
            entry.fetching = false;
            entry.fetched.notify_waiters();
        }
    }
}

enum Plan {
    Serve,
    ServeAndRefresh,
    Fetch,
    Join(Arc<Notify>),
}

/// Set of side effects applied after a successful mutation.
#[derive(Default)]
pub struct MutationEffects {
    invalidate: Vec<QueryKey>,
    patches: Vec<Box<dyn FnOnce(&QueryClient) + Send>>,
}

impl MutationEffects {
    /// No effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every query under `prefix`.
    pub fn invalidate(mut self, prefix: QueryKey) -> Self {
        self.invalidate.push(prefix);
        self
    }

    /// Patch cached data directly.
    pub fn patch(mut self, f: impl FnOnce(&QueryClient) + Send + 'static) -> Self {
        self.patches.push(Box::new(f));
        self
    }
}

/// Shared cache of query results keyed by [`QueryKey`].
///
/// Cloning is cheap and every clone sees the same entries. Entries hold
/// values of any type; reading one back with a different type than it was
/// written with yields no data.
#[derive(Clone)]
pub struct QueryClient {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    clock: SharedClock,
}

impl QueryClient {
    /// Create an empty client.
    pub fn new(clock: SharedClock) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Read a query, fetching as needed.
    ///
    /// - fresh data is returned without a fetch;
    /// - stale data is returned at once with `is_fetching` set, and a
    ///   background refetch replaces it when done;
    /// - with no data, after an error, or after invalidation the fetch is
    ///   awaited, retried per `options.retry`;
    /// - a caller arriving while that fetch runs waits for it instead of
    ///   sending its own;
    /// - `options.force_fetch` always fetches and awaits.
    ///
    /// Disabled queries return the current snapshot and never fetch. Every
    /// enabled call first drops entries idle past their GC time.
    pub async fn query<T, E, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryResult<T>
    where
        T: Clone + Send + Sync + 'static,
        E: Display + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if !options.enabled {
            return self.peek(&key);
        }

        let now = self.clock.now();
        let plan = {
            let mut entries = self.lock();
            Self::sweep(&mut entries, now, Some(&key));
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now, options.gc_time));
            entry.last_used = now;
            entry.gc_time = options.gc_time;

            let usable = entry.status == QueryStatus::Success
                && !entry.invalidated
                && entry.data.is_some();
            if options.force_fetch {
                entry.fetching = true;
                Plan::Fetch
            } else if usable && entry.is_fresh(now, options.stale_time) {
                Plan::Serve
            } else if entry.fetching {
                if usable {
                    Plan::Serve
                } else {
                    Plan::Join(Arc::clone(&entry.fetched))
                }
            } else {
                entry.fetching = true;
                if usable {
                    Plan::ServeAndRefresh
                } else {
                    Plan::Fetch
                }
            }
        };

        match plan {
            Plan::Serve => {
                debug!(query_key = %key, "query served from cache");
                self.peek(&key)
            }
            Plan::ServeAndRefresh => {
                debug!(query_key = %key, "query stale, refetching in background");
                let snapshot = self.peek(&key);
                let client = self.clone();
                let retry = options.retry;
                tokio::spawn(async move {
                    client.run_fetch(key, retry, fetcher).await;
                });
                snapshot
            }
            Plan::Fetch => {
                self.run_fetch(key.clone(), options.retry, fetcher).await;
                self.peek(&key)
            }
            Plan::Join(fetched) => {
                debug!(query_key = %key, "query joined in-flight fetch");
                let notified = fetched.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.is_fetching(&key) {
                    notified.await;
                }
                self.peek(&key)
            }
        }
    }

    /// Fetch now, whatever the cache holds.
    pub async fn refetch<T, E, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryResult<T>
    where
        T: Clone + Send + Sync + 'static,
        E: Display + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let now = self.clock.now();
        {
            let mut entries = self.lock();
            Self::sweep(&mut entries, now, Some(&key));
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now, options.gc_time));
            entry.last_used = now;
            entry.gc_time = options.gc_time;
        }
        self.run_fetch(key.clone(), options.retry, fetcher).await;
        self.peek(&key)
    }

    /// Current state of a query, without fetching.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> QueryResult<T> {
        self.lock()
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_else(QueryResult::idle)
    }

    /// Cached data of a query.
    pub fn get_query_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.peek(key).data
    }

    /// Replace cached data through `updater`.
    ///
    /// The updater sees the current data, if any; returning `None` leaves
    /// the entry untouched.
    pub fn set_query_data<T, U>(&self, key: &QueryKey, updater: U)
    where
        T: Clone + Send + Sync + 'static,
        U: FnOnce(Option<T>) -> Option<T>,
    {
        let now = self.clock.now();
        let current = self.get_query_data::<T>(key);
        if let Some(next) = updater(current) {
            let mut entries = self.lock();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now, QueryOptions::default().gc_time));
            entry.data = Some(Arc::new(next));
            entry.status = QueryStatus::Success;
            entry.error = None;
            entry.updated_at = Some(now);
        }
    }

    /// Mark every query under `prefix` for refetch. Returns how many matched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, entry) in self.lock().iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(prefix = %prefix, count, "queries invalidated");
        count
    }

    /// Drop entries unused for longer than their GC time. Returns how many
    /// were dropped.
    pub fn collect_garbage(&self) -> usize {
        let now = self.clock.now();
        Self::sweep(&mut self.lock(), now, None)
    }

    fn sweep(
        entries: &mut HashMap<QueryKey, Entry>,
        now: DateTime<Utc>,
        keep: Option<&QueryKey>,
    ) -> usize {
        let before = entries.len();
        entries.retain(|key, entry| Some(key) == keep || !entry.is_idle(now));
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, "idle queries collected");
        }
        dropped
    }

    fn is_fetching(&self, key: &QueryKey) -> bool {
        self.lock().get(key).map_or(false, |entry| entry.fetching)
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run a mutation once, without retries, and apply the effects built
    /// from its result on success.
    pub async fn mutate<T, E, Fut>(
        &self,
        mutation: Fut,
        on_success: impl FnOnce(&T) -> MutationEffects,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match mutation.await {
            Ok(value) => {
                let effects = on_success(&value);
                for prefix in &effects.invalidate {
                    self.invalidate(prefix);
                }
                for patch in effects.patches {
                    patch(self);
                }
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "mutation failed");
                Err(e)
            }
        }
    }

    async fn run_fetch<T, E, F, Fut>(&self, key: QueryKey, retry: RetryPolicy, fetcher: F)
    where
        T: Send + Sync + 'static,
        E: Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let now = self.clock.now();
            let mut entries = self.lock();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now, QueryOptions::default().gc_time));
            entry.fetching = true;
        }
        let mut in_flight = InFlight {
            client: self,
            key: &key,
            finished: false,
        };

        let result = retry_with_backoff(&retry, |_| fetcher()).await;

        let now = self.clock.now();
        let mut entries = self.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now, QueryOptions::default().gc_time));
        entry.fetching = false;
        match result {
            Ok(value) => {
                entry.data = Some(Arc::new(value));
                entry.status = QueryStatus::Success;
                entry.error = None;
                entry.updated_at = Some(now);
                entry.invalidated = false;
                debug!(query_key = %key, "query fetched");
            }
            Err(e) => {
                warn!(query_key = %key, error = %e, "query failed");
                entry.status = QueryStatus::Error;
                entry.error = Some(e.to_string());
            }
        }
        entry.fetched.notify_waiters();
        in_flight.finished = true;
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::ManualClock;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn client() -> (QueryClient, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_epoch());
        (QueryClient::new(clock.clone()), clock)
    }

    fn counting(
        calls: &Arc<AtomicU32>,
        value: &'static str,
    ) -> impl Fn() -> futures::future::Ready<Result<String, String>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(value.to_string()))
        }
    }

    fn options() -> QueryOptions {
        QueryOptions::new()
            .with_stale_time(Duration::from_secs(60))
            .with_retry(RetryPolicy::none())
    }

    // === Freshness ===

    #[tokio::test]
    async fn test_fresh_data_served_without_fetch() {
        let (client, clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("a");

        let first = client.query(key.clone(), &options(), counting(&calls, "v1")).await;
        clock.advance(Duration::from_secs(30));
        let second = client.query(key, &options(), counting(&calls, "v2")).await;

        assert_eq!(first.data.as_deref(), Some("v1"));
        assert_eq!(second.data.as_deref(), Some("v1"));
        assert!(!second.is_fetching);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_data_returned_while_refetching() {
        let (client, clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("a");

        client.query(key.clone(), &options(), counting(&calls, "v1")).await;
        clock.advance(Duration::from_secs(61));

        let stale = client.query(key.clone(), &options(), counting(&calls, "v2")).await;
        assert_eq!(stale.data.as_deref(), Some("v1"));
        assert!(stale.is_fetching);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let after: QueryResult<String> = client.peek(&key);
        assert_eq!(after.data.as_deref(), Some("v2"));
        assert!(!after.is_fetching);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidated_query_fetches() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("products").push("featured").push(6);

        client.query(key.clone(), &options(), counting(&calls, "v1")).await;
        assert_eq!(client.invalidate(&QueryKey::root("products").push("featured")), 1);
        let result = client.query(key, &options(), counting(&calls, "v2")).await;

        assert_eq!(result.data.as_deref(), Some("v2"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_query_never_fetches() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));

        let result = client
            .query(QueryKey::root("search"), &options().enabled(false), counting(&calls, "x"))
            .await;
        assert_eq!(result.status, QueryStatus::Idle);
        assert!(result.data.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // === Errors and retries ===

    #[tokio::test(start_paused = true)]
    async fn test_error_after_retries_then_refetch_recovers() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("b");
        let retry = RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(30));
        let opts = options().with_retry(retry);

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                futures::future::ready(Err::<String, _>("server down".to_string()))
            }
        };
        let result = client.query(key.clone(), &opts, failing).await;
        assert!(result.is_error());
        assert_eq!(result.error.as_deref(), Some("server down"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let recovered = client
            .refetch(key, &opts, counting(&calls, "ok"))
            .await;
        assert!(recovered.is_success());
        assert_eq!(recovered.error, None);
        assert_eq!(recovered.data.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_previous_data() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("c");

        client.query(key.clone(), &options(), counting(&calls, "v1")).await;
        let failed = client
            .refetch(key, &options(), || {
                futures::future::ready(Err::<String, _>("nope".to_string()))
            })
            .await;

        assert!(failed.is_error());
        assert_eq!(failed.data.as_deref(), Some("v1"));
    }

    // === Direct cache access ===

    #[tokio::test]
    async fn test_set_query_data_patches_existing() {
        let (client, _clock) = client();
        let key = QueryKey::root("n");
        client
            .query(key.clone(), &options(), || futures::future::ready(Ok::<u32, String>(1)))
            .await;

        client.set_query_data::<u32, _>(&key, |old| old.map(|n| n + 1));
        assert_eq!(client.get_query_data::<u32>(&key), Some(2));

        client.set_query_data::<u32, _>(&QueryKey::root("missing"), |old| old.map(|n| n + 1));
        assert_eq!(client.get_query_data::<u32>(&QueryKey::root("missing")), None);
    }

    #[tokio::test]
    async fn test_wrong_type_reads_nothing() {
        let (client, _clock) = client();
        let key = QueryKey::root("typed");
        client
            .query(key.clone(), &options(), || futures::future::ready(Ok::<u32, String>(7)))
            .await;
        assert_eq!(client.get_query_data::<String>(&key), None);
        assert_eq!(client.get_query_data::<u32>(&key), Some(7));
    }

    #[tokio::test]
    async fn test_collect_garbage_drops_idle_entries() {
        let (client, clock) = client();
        let short = options().with_gc_time(Duration::from_secs(60));
        let long = options().with_gc_time(Duration::from_secs(3600));

        client
            .query(QueryKey::root("short"), &short, || futures::future::ready(Ok::<u32, String>(1)))
            .await;
        client
            .query(QueryKey::root("long"), &long, || futures::future::ready(Ok::<u32, String>(2)))
            .await;

        clock.advance(Duration::from_secs(120));
        assert_eq!(client.collect_garbage(), 1);
        assert_eq!(client.len(), 1);
        assert_eq!(client.get_query_data::<u32>(&QueryKey::root("long")), Some(2));
    }

    #[tokio::test]
    async fn test_query_sweeps_idle_entries() {
        let (client, clock) = client();
        let short = options().with_gc_time(Duration::from_secs(60));

        client
            .query(QueryKey::root("old"), &short, || futures::future::ready(Ok::<u32, String>(1)))
            .await;
        clock.advance(Duration::from_secs(61));
        client
            .query(QueryKey::root("new"), &short, || futures::future::ready(Ok::<u32, String>(2)))
            .await;

        assert_eq!(client.len(), 1);
        assert_eq!(client.get_query_data::<u32>(&QueryKey::root("old")), None);
    }

    // === Forced and concurrent fetches ===

    #[tokio::test]
    async fn test_forced_query_skips_fresh_data() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("a");

        client.query(key.clone(), &options(), counting(&calls, "v1")).await;
        let forced = client
            .query(key, &options().forced(true), counting(&calls, "v2"))
            .await;

        assert_eq!(forced.data.as_deref(), Some("v2"));
        assert!(!forced.is_fetching);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_share_one_fetch() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("shared");

        let slow = || {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok::<_, String>("v1".to_string())
                }
            }
        };

        let (opts_a, opts_b) = (options(), options());
        let (a, b) = futures::join!(
            client.query(key.clone(), &opts_a, slow()),
            client.query(key.clone(), &opts_b, slow())
        );

        assert_eq!(a.data.as_deref(), Some("v1"));
        assert_eq!(b.data.as_deref(), Some("v1"));
        assert!(!b.is_fetching);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_fetch_releases_waiters() {
        let (client, _clock) = client();
        let key = QueryKey::root("dropped");

        let opts = options();
        let pending = client.query(key.clone(), &opts, || {
            futures::future::pending::<Result<u32, String>>()
        });
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());
        assert!(client.peek::<u32>(&key).is_fetching);

        drop(pending);
        assert!(!client.peek::<u32>(&key).is_fetching);
    }

    // === Mutations ===

    #[tokio::test]
    async fn test_mutation_applies_effects_on_success() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let list = QueryKey::root("products").push("featured");
        let detail = QueryKey::root("products").push("details").push(1);

        client.query(list.clone(), &options(), counting(&calls, "list")).await;
        client.query(detail.clone(), &options(), counting(&calls, "detail")).await;

        let detail_key = detail.clone();
        let result = client
            .mutate(async { Ok::<_, String>(true) }, |_| {
                MutationEffects::new()
                    .invalidate(list.clone())
                    .patch(move |c| {
                        c.set_query_data::<String, _>(&detail_key, |old| {
                            old.map(|s| format!("{}+fav", s))
                        })
                    })
            })
            .await;

        assert_eq!(result, Ok(true));
        assert_eq!(
            client.get_query_data::<String>(&detail).as_deref(),
            Some("detail+fav")
        );
        let again = client.query(list, &options(), counting(&calls, "list2")).await;
        assert_eq!(again.data.as_deref(), Some("list2"));
    }

    #[tokio::test]
    async fn test_failed_mutation_has_no_effects() {
        let (client, _clock) = client();
        let calls = Arc::new(AtomicU32::new(0));
        let key = QueryKey::root("k");
        client.query(key.clone(), &options(), counting(&calls, "v1")).await;

        let result: Result<(), String> = client
            .mutate(async { Err("rejected".to_string()) }, |_| {
                MutationEffects::new().invalidate(QueryKey::root("k"))
            })
            .await;

        assert!(result.is_err());
        let cached = client.query(key, &options(), counting(&calls, "v2")).await;
        assert_eq!(cached.data.as_deref(), Some("v1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
