use crate::config::AppConfig;
use crate::models::SearchResponse;
use crate::search::errors::{extract_detail, SearchError};
use crate::search::traits::SearchBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const AI_SEARCH_PATH: &str = "/api/v1/search/ai";

/// AI search over the real-estate REST API
pub struct HttpSearchBackend {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSearchBackend {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.api_url.trim_end_matches('/'), AI_SEARCH_PATH),
            token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decode a 2xx body, bare or wrapped in `{"success", "data"}`.
fn parse_body(body: &str) -> Result<SearchResponse, SearchError> {
    decode_body(body).map_err(|error| {
        if let SearchError::InvalidResponse(detail) = &error {
            warn!("Undecodable AI search response: {}", detail);
        }
        error
    })
}

fn decode_body(body: &str) -> Result<SearchResponse, SearchError> {
    let mut value: Value = serde_json::from_str(body)
        .map_err(|error| SearchError::InvalidResponse(error.to_string()))?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("success=false");
        return Err(SearchError::InvalidResponse(message.to_string()));
    }

    let payload = match value.get_mut("data").map(Value::take) {
        Some(data) => data,
        None => value,
    };

    serde_json::from_value(payload).map_err(|error| SearchError::InvalidResponse(error.to_string()))
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        debug!("POST {} query={:?}", self.endpoint, query);

        let mut request = self.client.post(&self.endpoint).json(&json!({ "query": query }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|error| {
            warn!("AI search transport error: {}", error);
            SearchError::from_transport(&error)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| SearchError::from_transport(&error))?;

        if !status.is_success() {
            warn!("AI search returned status: {}", status);
            return Err(SearchError::from_status(status.as_u16(), extract_detail(&body)));
        }

        debug!("Downloaded {} bytes of search results", body.len());
        parse_body(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
