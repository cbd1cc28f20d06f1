//! Domain service for the per-user history dashboard.
//!
//! Lists both entry kinds as one paginated feed and handles save, detail,
//! delete and bulk cleanup. Every operation is scoped to the owning user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::CleanupCounts;
use crate::domain::feed::FeedPage;
use crate::domain::{EntryKind, KindFilter, UserId};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for DashboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Body of a save request, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SavePayload {
    Search(SearchSave),
    Image(ImageSave),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchSave {
    #[serde(default, alias = "q")]
    pub query: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageSave {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Value>>,
}

impl SavePayload {
    /// Validates an untyped request body. A missing or unrecognized `type`
    /// is rejected as invalid input, as is a malformed body for a known type.
    pub fn from_value(value: Value) -> Result<Self, DashboardError> {
        match value.get("type").and_then(Value::as_str) {
            Some("search" | "image") => serde_json::from_value(value)
                .map_err(|e| DashboardError::InvalidInput(e.to_string())),
            _ => Err(DashboardError::InvalidInput("Unknown type".to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, rename = "type")]
    pub kind: KindFilter,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default)]
    pub q: Option<String>,
}

const fn default_page() -> u64 {
    1
}

/// A single stored entry with its full content.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryDetail {
    Search {
        id: i32,
        query: String,
        results: Vec<Value>,
        created_at: DateTime<Utc>,
        title: String,
    },
    Image {
        id: i32,
        prompt: String,
        images: Vec<Value>,
        created_at: DateTime<Utc>,
        title: String,
    },
}

#[async_trait::async_trait]
pub trait DashboardService: Send + Sync {
    /// Unified, newest-first feed for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidInput`] when `page` is 0.
    async fn list(&self, owner: UserId, query: &ListQuery) -> Result<FeedPage, DashboardError>;

    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] if the entry is absent or owned by another user.
    async fn get(&self, owner: UserId, id: i32, kind: EntryKind)
    -> Result<EntryDetail, DashboardError>;

    /// Persists the entry and returns its id.
    async fn save(&self, owner: UserId, payload: SavePayload) -> Result<i32, DashboardError>;

    async fn delete(&self, owner: UserId, id: i32, kind: EntryKind) -> Result<(), DashboardError>;

    /// Deletes every entry of `owner` whose query or prompt is empty.
    async fn cleanup_empty(&self, owner: UserId) -> Result<CleanupCounts, DashboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_payload_accepts_query_alias() {
        let payload =
            SavePayload::from_value(json!({"type": "search", "q": "rust", "results": []})).unwrap();
        assert_eq!(
            payload,
            SavePayload::Search(SearchSave {
                query: Some("rust".to_string()),
                results: Some(Vec::new()),
            })
        );
    }

    #[test]
    fn save_payload_tolerates_missing_fields() {
        let payload = SavePayload::from_value(json!({"type": "image", "images": null})).unwrap();
        assert_eq!(payload, SavePayload::Image(ImageSave::default()));
    }

    #[test]
    fn save_payload_rejects_unknown_type() {
        for body in [json!({"type": "video"}), json!({"prompt": "x"}), json!({"type": 3})] {
            assert!(matches!(
                SavePayload::from_value(body),
                Err(DashboardError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn save_payload_rejects_malformed_records() {
        let body = json!({"type": "search", "query": "x", "results": "nope"});
        assert!(matches!(
            SavePayload::from_value(body),
            Err(DashboardError::InvalidInput(_))
        ));
    }

    #[test]
    fn detail_serializes_with_type_tag() {
        let detail = EntryDetail::Image {
            id: 4,
            prompt: "cat".to_string(),
            images: vec![json!({"url": "http://x/a.png"})],
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            title: "cat".to_string(),
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["images"][0]["url"], "http://x/a.png");
    }
}
