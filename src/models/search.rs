use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
}

/// Response of a search run. `id` is a coarse timestamp, not a stable key.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub id: i64,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub created_at: DateTime<Utc>,
}
