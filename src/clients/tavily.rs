use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TAVILY_API: &str = "https://api.tavily.com/search";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct TavilyResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
pub struct TavilyResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
    timeout: Duration,
}

impl TavilyClient {
    #[must_use]
    pub fn with_shared_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: TAVILY_API.to_string(),
            api_key: api_key.into(),
            max_results: 5,
            timeout: Duration::from_secs(20),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub const fn with_limits(mut self, max_results: u32, timeout: Duration) -> Self {
        self.max_results = max_results;
        self.timeout = timeout;
        self
    }

    pub async fn search(&self, query: &str) -> Result<TavilyResponse> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: "basic",
            include_answer: true,
            max_results: self.max_results,
        };

        debug!(query = %query, "Querying Tavily");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Tavily API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}
