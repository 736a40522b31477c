use crate::models::{ApartmentHit, RecentView};
use crate::storage::{load_list, save_list, KeyValueStore};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

pub const RECENT_VIEWS_KEY: &str = "recent_views";

pub const MAX_RECENT_VIEWS: usize = 20;

/// Recently opened apartments, newest first, one entry per `apt_id`.
/// Unlike search history, single entries can be removed.
pub struct RecentViews {
    views: VecDeque<RecentView>,
    storage: Arc<dyn KeyValueStore>,
}

impl RecentViews {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut views: VecDeque<RecentView> =
            load_list::<RecentView>(storage.as_ref(), RECENT_VIEWS_KEY).into();
        views.truncate(MAX_RECENT_VIEWS);
        Self { views, storage }
    }

    pub fn record(&mut self, hit: &ApartmentHit, viewed_at: DateTime<Utc>) {
        self.views.retain(|view| view.apt_id != hit.apt_id);
        self.views.push_front(RecentView {
            apt_id: hit.apt_id,
            apt_name: hit.apt_name.clone(),
            address: hit.address.clone(),
            viewed_at,
        });
        self.views.truncate(MAX_RECENT_VIEWS);
        self.persist();
    }

    /// Returns false if the apartment was not in the list
    pub fn remove(&mut self, apt_id: i64) -> bool {
        let before = self.views.len();
        self.views.retain(|view| view.apt_id != apt_id);
        if self.views.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.views.clear();
        if let Err(e) = self.storage.remove(RECENT_VIEWS_KEY) {
            warn!("Failed to clear recent views: {:#}", e);
        }
    }

    pub fn list(&self) -> Vec<RecentView> {
        self.views.iter().cloned().collect()
    }

    fn persist(&self) {
        if let Err(e) = save_list(self.storage.as_ref(), RECENT_VIEWS_KEY, self.views.iter()) {
            warn!("Failed to save recent views: {:#}", e);
        }
    }
}
