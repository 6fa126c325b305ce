// ── Listing query/filter/pagination engine ──
//
// Builds a filtered query against the gateway, paginates the result
// client-side, and re-queries on every filter change. State is
// published through a `watch` channel; consumers render whatever the
// current state is and never block.
//
// In-flight requests are not cancelled. Each request carries a
// sequence number taken at issue time; a response is applied only if
// no newer request has been issued since, so the last-issued filter
// always wins regardless of arrival order.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::gateway::ListingGateway;
use crate::model::{Listing, ListingFilter};

/// Fixed page size of the listings grid.
pub const PAGE_SIZE: usize = 9;

/// Observable engine state.
#[derive(Debug, Clone, Default)]
pub enum EngineState {
    /// No fetch has been issued yet.
    #[default]
    Idle,
    /// A fetch is in flight; previous rows are gone.
    Loading,
    /// The last fetch succeeded (possibly with zero rows).
    Loaded(Arc<Vec<Arc<Listing>>>),
    /// The last fetch failed; no rows are shown and no retry is
    /// scheduled.
    Error(String),
}

impl EngineState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn rows(&self) -> Option<&Arc<Vec<Arc<Listing>>>> {
        match self {
            Self::Loaded(rows) => Some(rows),
            _ => None,
        }
    }
}

struct EngineInner {
    state: watch::Sender<EngineState>,
    filter: Mutex<ListingFilter>,
    /// 1-based page index, reset on every filter change.
    page: AtomicUsize,
    /// Issue counter for last-issued-wins staleness control.
    seq: AtomicU64,
}

/// The listing query/filter/pagination engine.
///
/// Cheaply cloneable; all clones share state. Generic over the gateway
/// so tests can drive it with in-memory fakes.
pub struct ListingEngine<G> {
    gateway: Arc<G>,
    inner: Arc<EngineInner>,
}

impl<G> Clone for ListingEngine<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: ListingGateway> ListingEngine<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (state, _) = watch::channel(EngineState::Idle);
        Self {
            gateway,
            inner: Arc::new(EngineInner {
                state,
                filter: Mutex::new(ListingFilter::default()),
                page: AtomicUsize::new(1),
                seq: AtomicU64::new(0),
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to state changes. Drop the receiver on teardown.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> EngineState {
        self.inner.state.borrow().clone()
    }

    /// Snapshot of the current filter.
    pub fn filter(&self) -> ListingFilter {
        self.inner
            .filter
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Issue a fetch with the current filter (view mount / manual
    /// reload). Transitions to Loading immediately.
    pub fn load(&self) {
        self.spawn_fetch();
    }

    /// Replace the filter. Resets to page 1 and re-queries, even when
    /// the new filter equals the old one (the source re-fetched on
    /// every change event).
    pub fn set_filter(&self, filter: ListingFilter) {
        if let Ok(mut current) = self.inner.filter.lock() {
            *current = filter;
        }
        self.inner.page.store(1, Ordering::SeqCst);
        self.spawn_fetch();
    }

    fn spawn_fetch(&self) {
        // Claim a sequence number before the state transition so a
        // response can tell whether anything newer was issued.
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = self.filter();
        let _ = self.inner.state.send(EngineState::Loading);

        let gateway = Arc::clone(&self.gateway);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = gateway.list(&filter).await;

            if inner.seq.load(Ordering::SeqCst) != seq {
                debug!(seq, "discarding stale listing response");
                return;
            }

            match result {
                Ok(rows) => {
                    debug!(seq, count = rows.len(), "listings loaded");
                    let snapshot = Arc::new(rows.into_iter().map(Arc::new).collect());
                    let _ = inner.state.send(EngineState::Loaded(snapshot));
                }
                Err(e) => {
                    warn!(seq, error = %e, "listing fetch failed");
                    let _ = inner.state.send(EngineState::Error(e.to_string()));
                }
            }
        });
    }

    // ── Pagination (operates only within Loaded) ─────────────────────

    /// Total pages for the current snapshot; 0 while not Loaded or
    /// when the snapshot is empty.
    pub fn page_count(&self) -> usize {
        self.inner
            .state
            .borrow()
            .rows()
            .map_or(0, |rows| rows.len().div_ceil(PAGE_SIZE))
    }

    /// Current 1-based page, clamped to the reachable range.
    pub fn page(&self) -> usize {
        let stored = self.inner.page.load(Ordering::SeqCst);
        stored.clamp(1, self.page_count().max(1))
    }

    pub fn can_next_page(&self) -> bool {
        self.page() < self.page_count()
    }

    pub fn can_prev_page(&self) -> bool {
        self.page() > 1
    }

    /// Advance one page. No-op at the upper bound.
    pub fn next_page(&self) {
        if self.can_next_page() {
            self.inner.page.store(self.page() + 1, Ordering::SeqCst);
        }
    }

    /// Go back one page. No-op at the lower bound.
    pub fn prev_page(&self) {
        if self.can_prev_page() {
            self.inner.page.store(self.page() - 1, Ordering::SeqCst);
        }
    }

    /// The rows of the current page: `rows[(page-1)*9 .. page*9]`.
    /// Empty while not Loaded.
    pub fn page_slice(&self) -> Vec<Arc<Listing>> {
        let state = self.inner.state.borrow().clone();
        let Some(rows) = state.rows() else {
            return Vec::new();
        };
        let page = self.page();
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(rows.len());
        if start >= rows.len() {
            return Vec::new();
        }
        rows[start..end].iter().map(Arc::clone).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{ListingId, PropertyType, UserId};
    use chrono::Utc;
    use estatelist_api::{ListingChanges, NewListingRecord};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;
    use uuid::Uuid;

    fn listing(title: &str, property_type: PropertyType) -> Listing {
        Listing {
            id: ListingId(Uuid::new_v4()),
            title: title.into(),
            description: String::new(),
            property_type,
            price: 100_000.0,
            location: "Springfield".into(),
            bedrooms: 3,
            bathrooms: 2,
            area_sqft: 1500,
            image_url: None,
            owner_id: UserId(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    /// Gateway fake with per-property-type latency and a programmable
    /// failure switch. Only `list` is exercised by the engine.
    struct FakeGateway {
        responses: HashMap<Option<PropertyType>, (Duration, Result<Vec<Listing>, String>)>,
    }

    impl FakeGateway {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn respond(
            mut self,
            property_type: Option<PropertyType>,
            delay: Duration,
            result: Result<Vec<Listing>, String>,
        ) -> Self {
            self.responses.insert(property_type, (delay, result));
            self
        }
    }

    impl ListingGateway for FakeGateway {
        async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, CoreError> {
            let (delay, result) = self
                .responses
                .get(&filter.property_type)
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            tokio::time::sleep(delay).await;
            result.map_err(|m| CoreError::OperationFailed { message: m })
        }

        async fn get(&self, id: ListingId) -> Result<Listing, CoreError> {
            Err(CoreError::ListingNotFound { id })
        }

        async fn list_by_owner(&self, _owner: UserId) -> Result<Vec<Listing>, CoreError> {
            Ok(Vec::new())
        }

        async fn insert(&self, _record: NewListingRecord) -> Result<Listing, CoreError> {
            unimplemented!("not exercised by the engine")
        }

        async fn update(
            &self,
            _id: ListingId,
            _changes: ListingChanges,
        ) -> Result<Listing, CoreError> {
            unimplemented!("not exercised by the engine")
        }

        async fn delete(&self, id: ListingId) -> Result<(), CoreError> {
            Err(CoreError::ListingNotFound { id })
        }

        async fn upload_image(
            &self,
            _name: String,
            _bytes: Vec<u8>,
            _content_type: String,
        ) -> Result<String, CoreError> {
            unimplemented!("not exercised by the engine")
        }

        async fn remove_image(&self, _name: String) -> Result<(), CoreError> {
            Ok(())
        }

        async fn profile(&self, _user: UserId) -> Result<crate::model::Profile, CoreError> {
            Err(CoreError::ProfileNotFound)
        }
    }

    async fn settle(rx: &mut watch::Receiver<EngineState>) -> EngineState {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow().clone();
            if !state.is_loading() {
                return state;
            }
        }
    }

    fn titles(state: &EngineState) -> Vec<String> {
        state
            .rows()
            .map(|rows| rows.iter().map(|l| l.title.clone()).collect())
            .unwrap_or_default()
    }

    // ── State machine ────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn load_moves_idle_to_loading_to_loaded() {
        let gateway = Arc::new(FakeGateway::new().respond(
            None,
            Duration::from_millis(10),
            Ok(vec![listing("a", PropertyType::House)]),
        ));
        let engine = ListingEngine::new(gateway);
        let mut rx = engine.subscribe();

        assert!(matches!(engine.state(), EngineState::Idle));

        engine.load();
        assert!(engine.state().is_loading());

        let state = settle(&mut rx).await;
        assert_eq!(titles(&state), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_failure_moves_to_error_without_retry() {
        let gateway = Arc::new(FakeGateway::new().respond(
            None,
            Duration::from_millis(5),
            Err("backend unavailable".into()),
        ));
        let engine = ListingEngine::new(gateway);
        let mut rx = engine.subscribe();

        engine.load();
        let state = settle(&mut rx).await;
        assert!(matches!(state, EngineState::Error(ref m) if m.contains("backend unavailable")));
        // No rows, no pages, and nothing further arrives.
        assert_eq!(engine.page_slice().len(), 0);
        assert_eq!(engine.page_count(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(engine.state(), EngineState::Error(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_loaded_not_error() {
        let gateway =
            Arc::new(FakeGateway::new().respond(None, Duration::from_millis(1), Ok(Vec::new())));
        let engine = ListingEngine::new(gateway);
        let mut rx = engine.subscribe();

        engine.load();
        let state = settle(&mut rx).await;
        assert!(state.rows().is_some());
        assert_eq!(engine.page_count(), 0);
        assert_eq!(engine.page(), 1);
    }

    // ── Last-issued-wins ─────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_filter() {
        // house: slow; condo: fast. Fire house then condo -- condo's
        // result lands first, house's arrives later and must be
        // discarded.
        let gateway = Arc::new(
            FakeGateway::new()
                .respond(
                    Some(PropertyType::House),
                    Duration::from_millis(100),
                    Ok(vec![listing("house-row", PropertyType::House)]),
                )
                .respond(
                    Some(PropertyType::Condo),
                    Duration::from_millis(10),
                    Ok(vec![listing("condo-row", PropertyType::Condo)]),
                ),
        );
        let engine = ListingEngine::new(gateway);

        engine.set_filter(ListingFilter {
            property_type: Some(PropertyType::House),
            ..ListingFilter::default()
        });
        engine.set_filter(ListingFilter {
            property_type: Some(PropertyType::Condo),
            ..ListingFilter::default()
        });

        // Let both responses arrive.
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(titles(&engine.state()), vec!["condo-row"]);
        assert_eq!(
            engine.filter().property_type,
            Some(PropertyType::Condo)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_resets_page_to_one() {
        let rows: Vec<Listing> = (0..20)
            .map(|i| listing(&format!("r{i}"), PropertyType::House))
            .collect();
        let gateway = Arc::new(FakeGateway::new().respond(
            None,
            Duration::from_millis(1),
            Ok(rows.clone()),
        ));
        let engine = ListingEngine::new(gateway.clone());
        let mut rx = engine.subscribe();

        engine.load();
        settle(&mut rx).await;
        engine.next_page();
        assert_eq!(engine.page(), 2);

        engine.set_filter(ListingFilter::default());
        settle(&mut rx).await;
        assert_eq!(engine.page(), 1);
    }

    // ── Pagination ───────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn page_slice_matches_index_arithmetic() {
        let rows: Vec<Listing> = (0..20)
            .map(|i| listing(&format!("r{i}"), PropertyType::House))
            .collect();
        let gateway =
            Arc::new(FakeGateway::new().respond(None, Duration::from_millis(1), Ok(rows)));
        let engine = ListingEngine::new(gateway);
        let mut rx = engine.subscribe();

        engine.load();
        settle(&mut rx).await;

        // 20 rows -> 3 pages of 9/9/2.
        assert_eq!(engine.page_count(), 3);
        assert_eq!(engine.page(), 1);
        let first: Vec<String> = engine.page_slice().iter().map(|l| l.title.clone()).collect();
        assert_eq!(first, (0..9).map(|i| format!("r{i}")).collect::<Vec<_>>());

        engine.next_page();
        engine.next_page();
        assert_eq!(engine.page(), 3);
        let last: Vec<String> = engine.page_slice().iter().map(|l| l.title.clone()).collect();
        assert_eq!(last, vec!["r18", "r19"]);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_is_noop_at_bounds() {
        let rows: Vec<Listing> = (0..10)
            .map(|i| listing(&format!("r{i}"), PropertyType::House))
            .collect();
        let gateway =
            Arc::new(FakeGateway::new().respond(None, Duration::from_millis(1), Ok(rows)));
        let engine = ListingEngine::new(gateway);
        let mut rx = engine.subscribe();

        engine.load();
        settle(&mut rx).await;

        assert!(!engine.can_prev_page());
        engine.prev_page();
        assert_eq!(engine.page(), 1);

        engine.next_page();
        assert_eq!(engine.page(), 2);
        assert!(!engine.can_next_page());
        engine.next_page();
        assert_eq!(engine.page(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pagination_outside_loaded_is_inert() {
        let engine = ListingEngine::new(Arc::new(FakeGateway::new()));
        assert_eq!(engine.page_count(), 0);
        assert_eq!(engine.page(), 1);
        engine.next_page();
        assert_eq!(engine.page(), 1);
        assert!(engine.page_slice().is_empty());
    }
}
