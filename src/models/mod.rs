use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Criteria the backend parsed out of a natural-language query.
///
/// Amounts are in 만원, as returned by the search API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_deposit: Option<f64>,
    pub max_deposit: Option<f64>,
    pub min_monthly_rent: Option<f64>,
    pub max_monthly_rent: Option<f64>,
    /// Anything else the parser returned (region, area, build year, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Map position of an apartment complex
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One apartment complex returned by the AI search endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApartmentHit {
    pub apt_id: i64,
    #[serde(default)]
    pub apt_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Coordinates,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub average_deposit: Option<f64>,
    #[serde(default)]
    pub average_monthly_rent: Option<f64>,
}

/// Body of a successful AI search call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub apartments: Vec<ApartmentHit>,
}

/// A persisted record of one completed AI search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub criteria: SearchCriteria,
    pub apartments: Vec<ApartmentHit>,
}

/// An apartment the user opened recently
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentView {
    pub apt_id: i64,
    pub apt_name: String,
    pub address: String,
    pub viewed_at: DateTime<Utc>,
}
