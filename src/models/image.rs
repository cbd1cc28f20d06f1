use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub provider: String,
    #[serde(rename = "q", default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// A displayable image: a direct URL or a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub meta: ImageMeta,
}

impl ImageRecord {
    #[must_use]
    pub fn new(url: impl Into<String>, provider: &str, query: Option<&str>) -> Self {
        Self {
            url: url.into(),
            meta: ImageMeta {
                provider: provider.to_string(),
                query: query.map(ToString::to_string),
            },
        }
    }
}

/// Response of an image generation. `id` is a coarse timestamp, not a stable key.
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub id: i64,
    pub prompt: String,
    pub images: Vec<ImageRecord>,
    pub created_at: DateTime<Utc>,
}
