use crate::history::HistoryStore;
use crate::models::{HistoryEntry, SearchResponse};
use crate::notify::Notifier;
use crate::search::{
    filter_hits, BlockReason, Clock, CooldownState, Dispatch, RequestCoordinator, RequestState,
    SearchBackend, SearchError, SystemClock,
};
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

const NO_PRICED_MATCHES: &str = "가격 정보가 있는 매물을 찾지 못했습니다.";

/// What the user sees after one AI search
#[derive(Debug)]
pub enum SessionOutcome {
    /// At least one listing with price data; recorded in history
    Found(HistoryEntry),
    /// The search worked but nothing had a price for the asked category
    NoMatches { query: String },
    Failed(SearchError),
    Blocked(BlockReason),
    Superseded,
}

/// One user's AI search flow: gate and dispatch through the coordinator,
/// filter the hits, then record them in history.
pub struct SearchSession {
    coordinator: RequestCoordinator,
    history: Mutex<HistoryStore>,
    notifier: Arc<dyn Notifier>,
    last_empty_query: Mutex<Option<String>>,
}

impl SearchSession {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_clock(backend, storage, notifier, Arc::new(SystemClock))
    }

    pub fn with_clock(
        backend: Arc<dyn SearchBackend>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coordinator: RequestCoordinator::new(backend, notifier.clone(), clock),
            history: Mutex::new(HistoryStore::open(storage)),
            notifier,
            last_empty_query: Mutex::new(None),
        }
    }

    fn history_lock(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn search(&self, query: &str) -> SessionOutcome {
        let query = query.trim();

        match self.coordinator.submit(query).await {
            Dispatch::Response(response) => self.complete(query, response),
            Dispatch::Failed(error) => SessionOutcome::Failed(error),
            Dispatch::Blocked(reason) => SessionOutcome::Blocked(reason),
            Dispatch::Superseded => SessionOutcome::Superseded,
        }
    }

    fn complete(&self, query: &str, response: SearchResponse) -> SessionOutcome {
        let SearchResponse {
            criteria,
            apartments,
        } = response;
        let total = apartments.len();
        let apartments = filter_hits(&criteria, apartments);

        if apartments.is_empty() {
            info!("No priced listings among {} hits for {:?}", total, query);
            let mut last = self
                .last_empty_query
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_deref() != Some(query) {
                *last = Some(query.to_string());
                self.notifier.show_error(NO_PRICED_MATCHES);
            }
            return SessionOutcome::NoMatches {
                query: query.to_string(),
            };
        }

        *self
            .last_empty_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;

        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            query: query.to_string(),
            timestamp: self.coordinator.clock().now(),
            criteria,
            apartments,
        };
        info!(
            "✅ {} of {} hits kept for {:?}",
            entry.apartments.len(),
            total,
            query
        );

        self.history_lock().append(entry.clone());
        self.notifier
            .show_success(&format!("{}개의 매물을 찾았습니다", entry.apartments.len()));

        SessionOutcome::Found(entry)
    }

    pub fn cancel(&self) {
        self.coordinator.cancel();
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history_lock().to_vec()
    }

    pub fn clear_history(&self) {
        self.history_lock().clear();
        info!("🗑️ Cleared AI search history");
    }

    pub fn state(&self) -> RequestState {
        self.coordinator.state()
    }

    pub fn cooldown(&self) -> CooldownState {
        self.coordinator.cooldown()
    }
}
