//! Fakes shared by unit tests

use crate::models::{ApartmentHit, Coordinates, HistoryEntry, SearchCriteria, SearchResponse};
use crate::notify::Notifier;
use crate::search::clock::Clock;
use crate::search::errors::SearchError;
use crate::search::traits::SearchBackend;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn hit(apt_id: i64, price: Option<f64>, deposit: Option<f64>, rent: Option<f64>) -> ApartmentHit {
    ApartmentHit {
        apt_id,
        apt_name: format!("아파트 {}", apt_id),
        address: "서울특별시 강남구 대치동".to_string(),
        location: Coordinates { lat: 37.4946, lng: 127.0624 },
        average_price: price,
        average_deposit: deposit,
        average_monthly_rent: rent,
    }
}

pub fn entry(query: &str) -> HistoryEntry {
    HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        query: query.to_string(),
        timestamp: Utc::now(),
        criteria: SearchCriteria::default(),
        apartments: vec![hit(1, Some(100000.0), None, None)],
    }
}

pub fn sale_response(hits: Vec<ApartmentHit>) -> SearchResponse {
    SearchResponse {
        criteria: SearchCriteria::default(),
        apartments: hits,
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        *self.now.lock().unwrap() += Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Notifier that remembers what it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    pub errors: Mutex<Vec<String>>,
    pub successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn show_success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}

/// Backend answering from a fixed table. Held queries park until `release`
/// is notified and signal `started` when they do.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<HashMap<String, Result<SearchResponse, SearchError>>>,
    held: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    pub started: Notify,
    pub release: Notify,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, query: &str, result: Result<SearchResponse, SearchError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), result);
    }

    pub fn hold(&self, query: &str) {
        self.held.lock().unwrap().insert(query.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());

        let held = self.held.lock().unwrap().contains(query);
        if held {
            self.started.notify_one();
            self.release.notified().await;
        }

        let response = self.responses.lock().unwrap().get(query).cloned();
        response.unwrap_or_else(|| Ok(SearchResponse::default()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Storage where every operation fails
pub struct FailingStorage;

impl KeyValueStore for FailingStorage {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("storage unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }

    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage unavailable")
    }
}
