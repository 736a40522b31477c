use crate::models::SearchResponse;
use crate::notify::Notifier;
use crate::search::clock::Clock;
use crate::search::errors::SearchError;
use crate::search::gate::{BlockReason, CooldownState, GateDecision, GateState, SearchGate};
use crate::search::traits::SearchBackend;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of handing one query to the coordinator
#[derive(Debug)]
pub enum Dispatch {
    /// The gate refused the query; nothing was sent
    Blocked(BlockReason),
    Response(SearchResponse),
    /// Classified failure; the user has been notified if the message was new
    Failed(SearchError),
    /// A newer query (or an explicit cancel) replaced this one
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
}

struct InFlight {
    generation: u64,
    query: String,
    token: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    gate: GateState,
    in_flight: Option<InFlight>,
    generation: u64,
}

/// Owns at most one in-flight AI search. A newer eligible query cancels the
/// older one, and a cancelled call never touches state or notifies.
pub struct RequestCoordinator {
    backend: Arc<dyn SearchBackend>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    gate: SearchGate,
    state: Mutex<SessionState>,
}

impl RequestCoordinator {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            notifier,
            clock,
            gate: SearchGate::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    // Never held across an await.
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gate, dispatch and classify one query.
    pub async fn submit(&self, query: &str) -> Dispatch {
        let query = query.trim();

        let (generation, token) = {
            let mut state = self.lock_state();

            if let GateDecision::Blocked(reason) = self.gate.check(query, &state.gate, self.clock.now()) {
                debug!("Search {:?} blocked: {:?}", query, reason);
                return Dispatch::Blocked(reason);
            }

            if let Some(previous) = state.in_flight.take() {
                info!("Cancelling superseded search {:?}", previous.query);
                previous.token.cancel();
            }

            state.generation += 1;
            let token = CancellationToken::new();
            state.in_flight = Some(InFlight {
                generation: state.generation,
                query: query.to_string(),
                token: token.clone(),
            });
            state.gate.last_query = Some(query.to_string());
            state.gate.last_failed = false;

            (state.generation, token)
        };

        info!("🔎 AI search #{} via {}: {:?}", generation, self.backend.name(), query);

        let result = tokio::select! {
            result = self.backend.search(query) => Some(result),
            _ = token.cancelled() => None,
        };

        let mut state = self.lock_state();
        let is_current = state
            .in_flight
            .as_ref()
            .map_or(false, |in_flight| in_flight.generation == generation);

        let result = match result {
            Some(result) if is_current && !token.is_cancelled() => result,
            _ => {
                debug!("Discarding result of superseded search #{}", generation);
                return Dispatch::Superseded;
            }
        };
        state.in_flight = None;

        match result {
            Ok(response) => {
                state.gate.cooldown.clear();
                debug!(
                    "Search #{} returned {} apartments",
                    generation,
                    response.apartments.len()
                );
                Dispatch::Response(response)
            }
            Err(error) => {
                let message = error.user_message();
                state.gate.last_failed = true;
                let is_new = state.gate.cooldown.arm(&message, self.clock.now());
                drop(state);

                warn!("Search #{} failed: {:?}", generation, error);
                if is_new {
                    self.notifier.show_error(&message);
                } else {
                    debug!("Suppressing repeated error notification");
                }
                Dispatch::Failed(error)
            }
        }
    }

    /// Abort whatever is in flight; its caller gets `Superseded`.
    /// The aborted query never completed, so it may be sent again.
    pub fn cancel(&self) {
        let mut state = self.lock_state();
        if let Some(in_flight) = state.in_flight.take() {
            info!("Cancelling search {:?}", in_flight.query);
            in_flight.token.cancel();
            if state.gate.last_query.as_deref() == Some(in_flight.query.as_str()) {
                state.gate.last_query = None;
            }
        }
    }

    pub fn state(&self) -> RequestState {
        if self.lock_state().in_flight.is_some() {
            RequestState::InFlight
        } else {
            RequestState::Idle
        }
    }

    pub fn cooldown(&self) -> CooldownState {
        self.lock_state().gate.cooldown.clone()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
