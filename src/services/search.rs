//! Web search with a canned fallback. A search never fails from the
//! caller's point of view: a missing key, an upstream error or an
//! unparseable answer all degrade to two deterministic results.

use anyhow::Result;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::tavily::{TavilyClient, TavilyResponse};
use crate::config::SearchConfig;
use crate::models::search::{SearchResponse, SearchResult};

pub struct SearchService {
    tavily: Option<TavilyClient>,
}

impl SearchService {
    #[must_use]
    pub const fn new(tavily: Option<TavilyClient>) -> Self {
        Self { tavily }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig, http: Client) -> Self {
        let tavily = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| {
                TavilyClient::with_shared_client(http, key.clone())
                    .with_endpoint(config.endpoint.clone())
                    .with_limits(
                        config.max_results,
                        Duration::from_secs(config.timeout_seconds),
                    )
            });

        Self::new(tavily)
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.tavily.is_some()
    }

    pub async fn search(&self, query: &str) -> SearchResponse {
        let query = query.trim().to_string();

        let results = match self.fetch(&query).await {
            Ok(results) => results,
            Err(e) => {
                if self.is_configured() {
                    warn!(query = %query, error = %e, "Search provider unavailable, using fallback");
                } else {
                    debug!(query = %query, "No search API key configured, using fallback");
                }
                fallback_results(&query)
            }
        };

        let now = Utc::now();
        SearchResponse {
            id: now.timestamp(),
            query,
            results,
            created_at: now,
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SearchResult>> {
        let client = self
            .tavily
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No Tavily API key configured"))?;

        let response = client.search(query).await?;
        Ok(normalize(response))
    }
}

/// Maps provider hits to `{title, url, summary}`. A synthesized answer, when
/// present, leads the list as a "Summary" entry without a URL.
#[must_use]
pub fn normalize(response: TavilyResponse) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = response
        .results
        .into_iter()
        .map(|item| {
            let url = item.url.unwrap_or_default();
            SearchResult {
                title: item
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| url.clone()),
                url,
                summary: item.content.filter(|c| !c.is_empty()).or(item.snippet),
            }
        })
        .collect();

    if let Some(answer) = response.answer.filter(|a| !a.is_empty()) {
        results.insert(
            0,
            SearchResult {
                title: "Summary".to_string(),
                url: String::new(),
                summary: Some(answer),
            },
        );
    }

    results
}

#[must_use]
pub fn fallback_results(query: &str) -> Vec<SearchResult> {
    vec![
        SearchResult {
            title: format!("What is {query}?"),
            url: "https://example.com/what-is".to_string(),
            summary: Some(format!("An overview of {query} with key ideas.")),
        },
        SearchResult {
            title: format!("{query} basics"),
            url: "https://example.com/basics".to_string(),
            summary: Some(format!("Basic concepts and quick start guide for {query}.")),
        },
    ]
}
