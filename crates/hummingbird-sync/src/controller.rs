//! Sync controller - owns the observable listing state
//!
//! The [`SyncController`] decides, for every user intent, whether to answer
//! from the session cache, the network, or fallback data, and publishes the
//! resulting [`ListingSnapshot`] through a `watch` channel.
//!
//! ## Concurrency
//!
//! Operations may be invoked concurrently from any task. All state lives
//! behind one mutex that is never held across an `.await`; fetches run with
//! the lock released.
//!
//! Every state-replacing operation (`load`, `refresh`, `search`, `set_sort`,
//! `reset`) bumps a generation counter and captures it. When a fetch
//! completes, its result is applied only if the captured generation is still
//! current, so the last *requested* operation always wins regardless of
//! network completion order. `load_more` captures the generation without
//! bumping it: it extends the current listing and is discarded if anything
//! replaces that listing while it is in flight.
//!
//! Pages are appended in page order. Each incoming page is ordered on its
//! own before it is appended; records already visible never move.
//!
//! ## Source selection
//!
//! ```text
//! intent ──→ cache complete? ──yes──→ in-memory filter + sort
//!                 │no
//!                 ▼
//!        offline / disconnected? ──yes──→ fallback (cache or seed)
//!                 │no
//!                 ▼
//!          IPageSource::fetch_page ──err──→ fallback + classified state
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use hummingbird_cache::RecordCache;
use hummingbird_core::config::SyncConfig;
use hummingbird_core::domain::{
    filter_and_sort, sort_records, AuthStatus, FailureReason, FetchError, FetchErrorKind,
    ListRecord, ListingSnapshot, NetworkStatus, Page, PageRequest, Provenance, SortSpec,
    SyncPhase, DEFAULT_PAGE_SIZE,
};
use hummingbird_core::ports::{IPageSource, ITokenProvider};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::debounce::SearchDebouncer;
use crate::reachability::ReachabilityMonitor;

/// Notice shown when a filtered listing comes back empty
pub const NO_RESULTS_NOTICE: &str = "No results found";

// ============================================================================
// Settings and outcomes
// ============================================================================

/// Tunables for a [`SyncController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub page_size: u32,
    pub search_debounce: Duration,
    pub default_sort: SortSpec,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(300),
            default_sort: SortSpec::default(),
        }
    }
}

impl From<&SyncConfig> for ControllerSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: config.search_debounce(),
            default_sort: config.default_sort,
        }
    }
}

/// What happened to an operation's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The result was applied to the published state
    Applied,
    /// A newer operation replaced this one; its result was discarded
    Superseded,
    /// Nothing to do (no more pages, a load already in flight, sort unchanged)
    Skipped,
}

// ============================================================================
// Shared state
// ============================================================================

struct Inner<R> {
    cache: RecordCache<R>,
    snapshot: ListingSnapshot<R>,
    generation: u64,
}

struct Shared<R: ListRecord> {
    inner: Mutex<Inner<R>>,
    state_tx: watch::Sender<ListingSnapshot<R>>,
    source: Arc<dyn IPageSource<R>>,
    tokens: Arc<dyn ITokenProvider>,
    seed: Vec<R>,
    settings: ControllerSettings,
    debouncer: SearchDebouncer,
    network_rx: watch::Receiver<NetworkStatus>,
}

/// Moves `snapshot` to `target`, logging transitions the state machine
/// does not list
fn enter<R>(snapshot: &mut ListingSnapshot<R>, target: SyncPhase) {
    if let Err(e) = snapshot.phase.transition_to(target) {
        warn!(error = %e, "Unlisted phase transition");
        snapshot.phase = target;
    }
}

/// Clears the visible list and its pagination
fn clear_visible<R>(snapshot: &mut ListingSnapshot<R>) {
    snapshot.records.clear();
    snapshot.current_page = 0;
    snapshot.total_pages = 0;
    snapshot.total_items = 0;
    snapshot.has_more = false;
    snapshot.provenance = Provenance::None;
    snapshot.is_fallback_data = false;
    snapshot.error_message = None;
    snapshot.notice = None;
}

/// Shows `records` as a complete, single-page listing
fn show_local<R>(snapshot: &mut ListingSnapshot<R>, records: Vec<R>, provenance: Provenance) {
    let len = records.len();
    snapshot.records = records;
    snapshot.current_page = u32::from(len > 0);
    snapshot.total_pages = u32::from(len > 0);
    snapshot.total_items = len as u64;
    snapshot.has_more = false;
    snapshot.provenance = provenance;
    snapshot.notice = empty_filter_notice(snapshot);
}

fn empty_filter_notice<R>(snapshot: &ListingSnapshot<R>) -> Option<String> {
    (snapshot.records.is_empty() && !snapshot.query.is_empty())
        .then(|| NO_RESULTS_NOTICE.to_string())
}

impl<R: ListRecord> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner<R>) {
        self.state_tx.send_replace(inner.snapshot.clone());
    }

    fn network(&self) -> NetworkStatus {
        *self.network_rx.borrow()
    }

    fn is_offline(&self, inner: &Inner<R>) -> bool {
        inner.snapshot.offline_mode || self.network().is_disconnected()
    }

    fn set_network(&self, status: NetworkStatus) {
        let mut inner = self.lock();
        if inner.snapshot.network != status {
            inner.snapshot.network = status;
            self.publish(&inner);
        }
    }

    /// Fallback records for the current query and sort
    ///
    /// The cache wins when it holds at least as many records as the seeded
    /// dataset; otherwise the seed is used.
    fn fallback(&self, inner: &Inner<R>) -> (Vec<R>, Provenance) {
        let query = inner.snapshot.query.as_str();
        let sort = inner.snapshot.sort;
        if !inner.cache.is_empty() && inner.cache.len() >= self.seed.len() {
            (inner.cache.query(query, sort), Provenance::Cache)
        } else {
            (filter_and_sort(&self.seed, query, sort), Provenance::Seed)
        }
    }

    /// Answers the current query from the complete cache
    fn apply_cache_query(&self, inner: &mut Inner<R>) {
        let offline = self.is_offline(inner);
        let records = inner.cache.query(&inner.snapshot.query, inner.snapshot.sort);
        trace!(len = records.len(), "Serving listing from cache");
        let snapshot = &mut inner.snapshot;
        show_local(snapshot, records, Provenance::Cache);
        snapshot.is_fallback_data = offline;
        snapshot.error_message = None;
        enter(snapshot, if offline { SyncPhase::Offline } else { SyncPhase::Ready });
    }

    /// Marks a new first-page load in flight and returns its request
    fn begin_initial(&self, inner: &mut Inner<R>, clear: bool) -> PageRequest {
        if clear {
            clear_visible(&mut inner.snapshot);
        }
        enter(&mut inner.snapshot, SyncPhase::LoadingInitial);
        self.publish(inner);
        PageRequest::new(1, self.settings.page_size, inner.snapshot.sort)
            .with_filter(&inner.snapshot.query)
    }

    /// Runs one fetch with a fresh token
    ///
    /// An empty token short-circuits to unauthorized without touching the
    /// source. Failures observed while the monitor reports no connectivity
    /// are treated as network-unreachable.
    async fn fetch(&self, request: &PageRequest) -> Result<Page<R>, FetchError> {
        let token = self.tokens.bearer_token();
        let result = if token.is_empty() {
            Err(FetchError::Unauthorized("no bearer token available".to_string()))
        } else {
            self.source.fetch_page(request, &token).await
        };

        match result {
            Err(e)
                if e.kind() != FetchErrorKind::NetworkUnreachable
                    && self.network().is_disconnected() =>
            {
                Err(FetchError::NetworkUnreachable(e.to_string()))
            }
            other => other,
        }
    }

    // ------------------------------------------------------------------------
    // First page
    // ------------------------------------------------------------------------

    async fn fetch_first_page(&self, generation: u64, request: PageRequest) -> SyncOutcome {
        let offline = {
            let inner = self.lock();
            self.is_offline(&inner)
        };
        if offline {
            return self.apply_offline(generation);
        }

        debug!(
            generation,
            page = request.page,
            filter = request.filter.as_deref().unwrap_or(""),
            sort = %request.sort.wire_value::<R>(),
            "Fetching first page"
        );
        let result = self.fetch(&request).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(generation, current = inner.generation, "Discarding superseded result");
            return SyncOutcome::Superseded;
        }

        match result {
            Ok(page) => self.apply_first_page(&mut inner, page, request.filter.is_some()),
            Err(e) => self.apply_failure(&mut inner, &e),
        }
        self.publish(&inner);
        SyncOutcome::Applied
    }

    fn apply_first_page(&self, inner: &mut Inner<R>, page: Page<R>, filtered: bool) {
        let page_number = page.page_number();
        let total_pages = page.total_pages();
        let total_items = page.total_items();
        let has_more = page.has_next();

        let mut records = page.items().to_vec();
        sort_records(&mut records, inner.snapshot.sort);

        if filtered {
            inner.cache.merge_records(page.into_items());
        } else {
            inner.cache.replace_page(page);
        }

        let snapshot = &mut inner.snapshot;
        snapshot.records = records;
        snapshot.current_page = page_number;
        snapshot.total_pages = total_pages;
        snapshot.total_items = total_items;
        snapshot.has_more = has_more;
        snapshot.provenance = Provenance::Network;
        snapshot.is_fallback_data = false;
        snapshot.error_message = None;
        snapshot.notice = empty_filter_notice(snapshot);
        snapshot.auth = AuthStatus::Authenticated;
        snapshot.reduced_trust = false;
        enter(snapshot, SyncPhase::Ready);

        info!(
            page = page_number,
            total_pages,
            total_items,
            visible = snapshot.records.len(),
            cached = inner.cache.len(),
            "First page applied"
        );
    }

    /// Substitutes fallback data and records the classified failure
    fn apply_failure(&self, inner: &mut Inner<R>, err: &FetchError) {
        let (records, provenance) = self.fallback(inner);
        let snapshot = &mut inner.snapshot;
        show_local(snapshot, records, provenance);
        snapshot.is_fallback_data = true;

        match FailureReason::from_fetch_error(err) {
            None => {
                debug!(error = %err, %provenance, "Network unreachable, showing fallback data");
                snapshot.error_message = None;
                enter(snapshot, SyncPhase::Ready);
            }
            Some(FailureReason::Unauthorized) => {
                warn!(error = %err, "Unauthorized, continuing with reduced trust");
                snapshot.error_message = None;
                snapshot.auth = AuthStatus::Unauthenticated;
                snapshot.reduced_trust = true;
                enter(snapshot, SyncPhase::Ready);
            }
            Some(reason) => {
                if err.is_client_bug() {
                    error!(error = %err, kind = %err.kind(), "Fetch failed");
                } else {
                    warn!(error = %err, kind = %err.kind(), "Fetch failed");
                }
                snapshot.error_message = Some(err.user_message());
                enter(snapshot, SyncPhase::Failed(reason));
            }
        }
    }

    fn apply_offline(&self, generation: u64) -> SyncOutcome {
        let mut inner = self.lock();
        if inner.generation != generation {
            return SyncOutcome::Superseded;
        }
        let (records, provenance) = self.fallback(&inner);
        info!(len = records.len(), %provenance, "Offline, serving fallback data");

        let snapshot = &mut inner.snapshot;
        show_local(snapshot, records, provenance);
        snapshot.is_fallback_data = true;
        snapshot.error_message = None;
        enter(snapshot, SyncPhase::Offline);
        self.publish(&inner);
        SyncOutcome::Applied
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    async fn load(&self) -> SyncOutcome {
        self.debouncer.cancel_pending();
        let (generation, request) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.snapshot.query.clear();
            let request = self.begin_initial(&mut inner, true);
            (inner.generation, request)
        };
        info!(generation, "Loading listing");
        self.fetch_first_page(generation, request).await
    }

    async fn refresh(&self) -> SyncOutcome {
        self.debouncer.cancel_pending();
        let (generation, request) = {
            let mut inner = self.lock();
            inner.generation += 1;
            let request = self.begin_initial(&mut inner, false);
            (inner.generation, request)
        };
        info!(generation, "Refreshing listing");
        self.fetch_first_page(generation, request).await
    }

    async fn load_more(&self) -> SyncOutcome {
        let (generation, request) = {
            let mut inner = self.lock();
            if !inner.snapshot.has_more || inner.snapshot.phase != SyncPhase::Ready {
                trace!(
                    has_more = inner.snapshot.has_more,
                    phase = %inner.snapshot.phase,
                    "load_more skipped"
                );
                return SyncOutcome::Skipped;
            }
            enter(&mut inner.snapshot, SyncPhase::LoadingMore);
            self.publish(&inner);
            let request = PageRequest::new(
                inner.snapshot.current_page + 1,
                self.settings.page_size,
                inner.snapshot.sort,
            )
            .with_filter(&inner.snapshot.query);
            (inner.generation, request)
        };

        debug!(generation, page = request.page, "Fetching next page");
        let offline = {
            let inner = self.lock();
            self.is_offline(&inner)
        };
        let result = if offline {
            Err(FetchError::NetworkUnreachable("offline".to_string()))
        } else {
            self.fetch(&request).await
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(generation, current = inner.generation, "Discarding superseded page");
            return SyncOutcome::Superseded;
        }

        match result {
            Ok(page) => self.apply_next_page(&mut inner, page, request.filter.is_some()),
            Err(e) => self.apply_next_page_failure(&mut inner, &e),
        }
        self.publish(&inner);
        SyncOutcome::Applied
    }

    fn apply_next_page(&self, inner: &mut Inner<R>, page: Page<R>, filtered: bool) {
        let page_number = page.page_number();
        let total_pages = page.total_pages();
        let total_items = page.total_items();
        let has_more = page.has_next();

        let visible: HashSet<&str> = inner.snapshot.records.iter().map(|r| r.id()).collect();
        let mut fresh: Vec<R> = page
            .items()
            .iter()
            .filter(|r| !visible.contains(r.id()))
            .cloned()
            .collect();
        // Earlier pages never move; only the incoming slice is ordered.
        sort_records(&mut fresh, inner.snapshot.sort);

        if filtered {
            inner.cache.merge_records(page.into_items());
        } else if let Err(e) = inner.cache.append_page(page.clone()) {
            warn!(error = %e, "Page out of order, merging instead");
            inner.cache.merge_records(page.into_items());
        }

        let snapshot = &mut inner.snapshot;
        let added = fresh.len();
        snapshot.records.extend(fresh);
        snapshot.current_page = page_number;
        snapshot.total_pages = total_pages;
        snapshot.total_items = total_items;
        snapshot.has_more = has_more;
        snapshot.provenance = Provenance::Network;
        snapshot.error_message = None;
        snapshot.auth = AuthStatus::Authenticated;
        snapshot.reduced_trust = false;
        enter(snapshot, SyncPhase::Ready);

        info!(
            page = page_number,
            added,
            visible = snapshot.records.len(),
            has_more,
            "Next page applied"
        );
    }

    /// A failed continuation keeps the records already shown
    fn apply_next_page_failure(&self, inner: &mut Inner<R>, err: &FetchError) {
        let snapshot = &mut inner.snapshot;
        match FailureReason::from_fetch_error(err) {
            None => {
                debug!(error = %err, "Next page unreachable");
                enter(snapshot, SyncPhase::Ready);
            }
            Some(FailureReason::Unauthorized) => {
                warn!(error = %err, "Unauthorized while paging");
                snapshot.auth = AuthStatus::Unauthenticated;
                snapshot.reduced_trust = true;
                enter(snapshot, SyncPhase::Ready);
            }
            Some(reason) => {
                warn!(error = %err, kind = %err.kind(), "Next page failed");
                snapshot.error_message = Some(err.user_message());
                enter(snapshot, SyncPhase::Failed(reason));
            }
        }
    }

    async fn search(&self, query: &str) -> SyncOutcome {
        if !self.debouncer.wait().await {
            return SyncOutcome::Superseded;
        }

        let (generation, request) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.snapshot.query = query.trim().to_string();
            if inner.cache.is_complete() {
                self.apply_cache_query(&mut inner);
                self.publish(&inner);
                debug!(query = %inner.snapshot.query, hits = inner.snapshot.records.len(), "Search answered from cache");
                return SyncOutcome::Applied;
            }
            let request = self.begin_initial(&mut inner, true);
            (inner.generation, request)
        };
        info!(generation, query = query.trim(), "Searching");
        self.fetch_first_page(generation, request).await
    }

    async fn set_sort(&self, sort: SortSpec) -> SyncOutcome {
        let (generation, request) = {
            let mut inner = self.lock();
            if inner.snapshot.sort == sort {
                return SyncOutcome::Skipped;
            }
            inner.generation += 1;
            inner.snapshot.sort = sort;
            if inner.cache.is_complete() {
                self.apply_cache_query(&mut inner);
                self.publish(&inner);
                debug!(sort = %sort.wire_value::<R>(), "Re-sorted from cache");
                return SyncOutcome::Applied;
            }
            let request = self.begin_initial(&mut inner, true);
            (inner.generation, request)
        };
        info!(generation, sort = %sort.wire_value::<R>(), "Sort changed, refetching");
        self.fetch_first_page(generation, request).await
    }

    fn set_offline_mode(&self, enabled: bool) -> bool {
        let mut inner = self.lock();
        if inner.snapshot.offline_mode == enabled {
            return false;
        }
        inner.snapshot.offline_mode = enabled;
        self.publish(&inner);
        info!(enabled, "Offline mode changed");
        true
    }

    fn reset(&self) {
        self.debouncer.cancel_pending();
        let mut inner = self.lock();
        inner.generation += 1;
        inner.cache.clear();
        let network = inner.snapshot.network;
        let mut fresh = ListingSnapshot::new(self.settings.default_sort);
        fresh.network = network;
        inner.snapshot = fresh;
        self.publish(&inner);
        info!(generation = inner.generation, "Listing reset");
    }
}

// ============================================================================
// SyncController
// ============================================================================

/// Offline-capable paginated listing of `R`
///
/// Must be created inside a tokio runtime: a background task mirrors the
/// owned reachability monitor into the published state for as long as the
/// controller lives.
pub struct SyncController<R: ListRecord> {
    shared: Arc<Shared<R>>,
    reachability: ReachabilityMonitor,
    network_task: JoinHandle<()>,
}

impl<R: ListRecord> SyncController<R> {
    /// Creates a controller in the `Idle` phase
    ///
    /// `seed` is the built-in dataset shown when neither the network nor a
    /// sufficiently populated cache is available; it may be empty.
    ///
    /// The controller owns `reachability` and shuts it down when dropped.
    pub fn new(
        source: Arc<dyn IPageSource<R>>,
        tokens: Arc<dyn ITokenProvider>,
        reachability: ReachabilityMonitor,
        seed: Vec<R>,
        settings: ControllerSettings,
    ) -> Self {
        let network_rx = reachability.subscribe();
        let mut snapshot = ListingSnapshot::new(settings.default_sort);
        snapshot.network = *network_rx.borrow();
        let (state_tx, _) = watch::channel(snapshot.clone());

        info!(
            page_size = settings.page_size,
            debounce_ms = settings.search_debounce.as_millis() as u64,
            seed = seed.len(),
            "Creating sync controller"
        );

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                cache: RecordCache::new(),
                snapshot,
                generation: 0,
            }),
            state_tx,
            source,
            tokens,
            seed,
            debouncer: SearchDebouncer::new(settings.search_debounce),
            settings,
            network_rx: network_rx.clone(),
        });

        let network_task = tokio::spawn(forward_network(Arc::downgrade(&shared), network_rx));

        Self {
            shared,
            reachability,
            network_task,
        }
    }

    /// Connectivity as last reported by the owned monitor
    pub fn network_status(&self) -> NetworkStatus {
        self.reachability.status()
    }

    /// Receiver of every published state
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot<R>> {
        self.shared.state_tx.subscribe()
    }

    /// The current state
    pub fn snapshot(&self) -> ListingSnapshot<R> {
        self.shared.lock().snapshot.clone()
    }

    /// Number of records held in the session cache
    pub fn cached_len(&self) -> usize {
        self.shared.lock().cache.len()
    }

    /// True once the whole remote dataset is cached
    pub fn is_cache_complete(&self) -> bool {
        self.shared.lock().cache.is_complete()
    }

    /// Fetches the first page with no filter, clearing the visible list
    pub async fn load(&self) -> SyncOutcome {
        self.shared.load().await
    }

    /// Fetches the next page and appends it
    ///
    /// Skipped when there are no more pages or the listing is not settled
    /// in `Ready`, which also coalesces concurrent calls.
    pub async fn load_more(&self) -> SyncOutcome {
        self.shared.load_more().await
    }

    /// Debounced name search
    ///
    /// Resolves to [`SyncOutcome::Superseded`] if another search arrives
    /// within the debounce window.
    pub async fn search(&self, query: &str) -> SyncOutcome {
        self.shared.search(query).await
    }

    /// Fire-and-forget [`SyncController::search`], for keystroke handlers
    pub fn spawn_search(&self, query: impl Into<String>) -> JoinHandle<SyncOutcome> {
        let shared = Arc::clone(&self.shared);
        let query = query.into();
        tokio::spawn(async move { shared.search(&query).await })
    }

    /// Changes the sort; a no-op when `sort` is already active
    pub async fn set_sort(&self, sort: SortSpec) -> SyncOutcome {
        self.shared.set_sort(sort).await
    }

    /// Flips the direction of the active sort field
    pub async fn toggle_sort_direction(&self) -> SyncOutcome {
        let current = self.shared.lock().snapshot.sort;
        self.shared.set_sort(current.toggled()).await
    }

    /// Re-fetches the first page, keeping the active query
    pub async fn refresh(&self) -> SyncOutcome {
        self.shared.refresh().await
    }

    /// Sets the manual offline override and refreshes
    pub async fn set_offline_mode(&self, enabled: bool) -> SyncOutcome {
        if !self.shared.set_offline_mode(enabled) {
            return SyncOutcome::Skipped;
        }
        self.shared.refresh().await
    }

    /// Flips the manual offline override and refreshes
    pub async fn toggle_offline_mode(&self) -> SyncOutcome {
        let enabled = !self.shared.lock().snapshot.offline_mode;
        self.set_offline_mode(enabled).await
    }

    /// Drops all cached and visible data and returns to `Idle`
    ///
    /// Any in-flight operation is superseded.
    pub fn reset(&self) {
        self.shared.reset();
    }
}

impl<R: ListRecord> Drop for SyncController<R> {
    fn drop(&mut self) {
        self.network_task.abort();
        self.reachability.shutdown();
    }
}

/// Mirrors reachability into the published state until either side goes away
async fn forward_network<R: ListRecord>(
    shared: Weak<Shared<R>>,
    mut network_rx: watch::Receiver<NetworkStatus>,
) {
    loop {
        let status = *network_rx.borrow_and_update();
        match shared.upgrade() {
            Some(shared) => shared.set_network(status),
            None => break,
        }
        if network_rx.changed().await.is_err() {
            break;
        }
    }
}
