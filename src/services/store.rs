//! Entity store: one observable collection per entity kind
//!
//! A store owns its collection exclusively. Every change goes through its
//! [`Signal`], so views only ever see complete snapshots.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    client::{CollectionShape, ResourceClient},
    error::{AppResult, FetchError},
    models::{EntityKind, Record, SearchQuery},
    signal::Signal,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifecycle of the most recent search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Synced,
    /// Optimistically added, waiting for the server
    Pending { ticket: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub record: Record,
    pub sync: SyncState,
}

impl Entry {
    fn synced(record: Record) -> Self {
        Self {
            record,
            sync: SyncState::Synced,
        }
    }

    fn is_ticket(&self, ticket: u64) -> bool {
        self.sync == SyncState::Pending { ticket }
    }
}

/// Read-only view of a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub entries: Vec<Entry>,
    pub status: FetchStatus,
    /// Query of the most recent search
    pub query: SearchQuery,
    pub last_add_error: Option<FetchError>,
    /// Time of the last applied successful search
    pub fetched_at: Option<DateTime<Utc>>,
    /// Number of searches started so far
    pub generation: u64,
}

impl StoreSnapshot {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.sync, SyncState::Pending { .. }))
            .count()
    }
}

/// Result of one `search` call, for callers that want to know.
/// Failures are already recorded in the store status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    Failed(FetchError),
    /// A newer search started before this one finished
    Superseded,
}

impl SearchOutcome {
    /// Record count when applied, `None` when superseded
    pub fn into_result(self) -> AppResult<Option<usize>> {
        match self {
            SearchOutcome::Applied { count } => Ok(Some(count)),
            SearchOutcome::Superseded => Ok(None),
            SearchOutcome::Failed(e) => Err(e.into()),
        }
    }
}

pub struct EntityStore {
    kind: EntityKind,
    endpoint: String,
    shape: CollectionShape,
    timeout: Duration,
    client: Arc<dyn ResourceClient>,
    state: Signal<StoreSnapshot>,
    next_ticket: AtomicU64,
}

impl EntityStore {
    pub fn new(kind: EntityKind, endpoint: impl Into<String>, client: Arc<dyn ResourceClient>) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            shape: CollectionShape::Array,
            timeout: DEFAULT_TIMEOUT,
            client,
            state: Signal::default(),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn with_shape(mut self, shape: CollectionShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    pub fn status(&self) -> FetchStatus {
        self.state.with(|s| s.status.clone())
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.with(|s| s.records().cloned().collect())
    }

    /// Search again with the query of the previous search
    pub async fn search(&self) -> SearchOutcome {
        let query = self.state.with(|s| s.query.clone());
        self.search_with(query).await
    }

    /// Replace the collection with the server's, filtered by `query`.
    ///
    /// Only the most recent search is ever applied: starting a new one
    /// cancels any search still in flight on this store.
    pub async fn search_with(&self, query: SearchQuery) -> SearchOutcome {
        // Subscribe before bumping so no later bump can be missed
        let watcher = self.state.subscribe();
        let mut generation = 0;
        self.state.update(|s| {
            s.generation += 1;
            s.status = FetchStatus::Loading;
            s.query = query.clone();
            generation = s.generation;
        });
        tracing::debug!("{} search #{} started", self.kind, generation);

        let fetch = tokio::time::timeout(
            self.timeout,
            self.client.fetch_collection(&self.endpoint, &query, &self.shape),
        );

        let result = tokio::select! {
            res = fetch => res.unwrap_or(Err(FetchError::Timeout)),
            _ = superseded(watcher, generation) => {
                tracing::debug!("{} search #{} superseded while in flight", self.kind, generation);
                return SearchOutcome::Superseded;
            }
        };

        self.apply_search(generation, result)
    }

    /// Drop the collection and go back to Idle. Cancels any search in flight.
    pub fn reset(&self) {
        self.state.update(|s| {
            *s = StoreSnapshot {
                generation: s.generation + 1,
                ..StoreSnapshot::default()
            };
        });
        tracing::debug!("{} store reset", self.kind);
    }

    /// Run `search` on the runtime without waiting for it
    pub fn spawn_search(self: &Arc<Self>) -> JoinHandle<SearchOutcome> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.search().await })
    }

    fn apply_search(&self, generation: u64, result: Result<Vec<Record>, FetchError>) -> SearchOutcome {
        let kind = self.kind;
        let mut outcome = SearchOutcome::Superseded;

        self.state.update_if(|s| {
            if s.generation != generation {
                return false;
            }
            match result {
                Ok(records) => {
                    tracing::info!("{} loaded {} records", kind, records.len());
                    outcome = SearchOutcome::Applied { count: records.len() };
                    s.entries = records.into_iter().map(Entry::synced).collect();
                    s.status = FetchStatus::Ready;
                    s.fetched_at = Some(Utc::now());
                }
                Err(e) => {
                    tracing::warn!("{} search failed, keeping {} stale records: {}", kind, s.entries.len(), e);
                    outcome = SearchOutcome::Failed(e.clone());
                    s.status = FetchStatus::Failed(e);
                }
            }
            true
        });

        if outcome == SearchOutcome::Superseded {
            tracing::debug!("{} search #{} resolved after a newer search, discarded", kind, generation);
        }
        outcome
    }

    /// Optimistically append `record`, then POST it.
    ///
    /// On success the pending entry becomes the server's record. On failure
    /// it is removed again and the error is kept in `last_add_error`. If a
    /// search replaced the collection in the meantime there is nothing to
    /// commit or roll back.
    pub async fn add(&self, record: Record) -> Result<Record, FetchError> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.state.update(|s| {
            s.entries.push(Entry {
                record: record.clone(),
                sync: SyncState::Pending { ticket },
            });
        });
        tracing::debug!("{} add #{} pending", self.kind, ticket);

        let result = tokio::time::timeout(self.timeout, self.client.create_record(&self.endpoint, &record))
            .await
            .unwrap_or(Err(FetchError::Timeout));

        match result {
            Ok(created) => {
                self.state.update(|s| {
                    if let Some(entry) = s.entries.iter_mut().find(|e| e.is_ticket(ticket)) {
                        *entry = Entry::synced(created.clone());
                    }
                    s.last_add_error = None;
                });
                tracing::info!("{} add #{} committed (id={:?})", self.kind, ticket, created.id());
                Ok(created)
            }
            Err(e) => {
                self.state.update(|s| {
                    s.entries.retain(|entry| !entry.is_ticket(ticket));
                    s.last_add_error = Some(e.clone());
                });
                tracing::warn!("{} add #{} rolled back: {}", self.kind, ticket, e);
                Err(e)
            }
        }
    }
}

/// Resolves once a search newer than `generation` has started
async fn superseded(mut watcher: watch::Receiver<StoreSnapshot>, generation: u64) {
    loop {
        if watcher.changed().await.is_err() {
            // The store is gone, nothing can supersede us any more
            std::future::pending::<()>().await;
        }
        if watcher.borrow_and_update().generation > generation {
            return;
        }
    }
}
