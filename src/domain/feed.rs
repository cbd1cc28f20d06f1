//! The unified dashboard feed: projection of both history kinds into one
//! shape, newest-first ordering and fixed-size pagination.
//!
//! Everything here is pure. Stored JSON that fails to parse is treated as
//! empty content rather than an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use super::EntryKind;
use crate::entities::{image_history, search_history};

pub const PAGE_SIZE: usize = 10;

/// Common listing shape for search and image entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: String,
    pub snippet: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub page: u64,
    pub total_pages: u64,
}

impl From<&search_history::Model> for FeedItem {
    fn from(row: &search_history::Model) -> Self {
        Self {
            id: row.id,
            kind: EntryKind::Search,
            title: search_title(row.query.as_deref()),
            snippet: search_snippet(row.results_json.as_deref()),
            image_url: None,
            created_at: row.created_at,
        }
    }
}

impl From<&image_history::Model> for FeedItem {
    fn from(row: &image_history::Model) -> Self {
        Self {
            id: row.id,
            kind: EntryKind::Image,
            title: non_empty(row.prompt.as_deref())
                .unwrap_or("untitled")
                .to_string(),
            snippet: None,
            image_url: row.image_url.clone(),
            created_at: row.created_at,
        }
    }
}

#[must_use]
pub fn search_title(query: Option<&str>) -> String {
    format!("Results for: {}", non_empty(query).unwrap_or("untitled"))
}

#[must_use]
pub fn image_title(prompt: Option<&str>) -> String {
    non_empty(prompt).unwrap_or("Image").to_string()
}

/// Title (or, failing that, summary) of the first stored search result.
#[must_use]
pub fn search_snippet(results_json: Option<&str>) -> Option<String> {
    let records = parse_records(results_json);
    let first = records.first()?.as_object()?;

    ["title", "summary"]
        .iter()
        .filter_map(|key| first.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Parses a stored JSON array. Anything else, malformed text included, is empty.
#[must_use]
pub fn parse_records(text: Option<&str>) -> Vec<Value> {
    match text.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Array(items))) => items,
        _ => Vec::new(),
    }
}

/// Image records to display for a stored entry. A known representative URL
/// is never hidden behind an empty record list.
#[must_use]
pub fn detail_images(meta: Option<&str>, image_url: Option<&str>) -> Vec<Value> {
    let images = parse_records(meta);
    if images.is_empty()
        && let Some(url) = non_empty(image_url)
    {
        return vec![serde_json::json!({ "url": url })];
    }
    images
}

/// URL of the first image record, read from `url` then `image_url`.
#[must_use]
pub fn representative_url(images: &[Value]) -> Option<String> {
    let first = images.first()?.as_object()?;

    ["url", "image_url"]
        .iter()
        .filter_map(|key| first.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Merges both projections newest first. Ties fall back to id, then kind,
/// both descending, so the order is stable across calls.
#[must_use]
pub fn merge(search: Vec<FeedItem>, image: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut merged: Vec<FeedItem> = search.into_iter().chain(image).collect();
    merged.sort_by(newest_first);
    merged
}

fn newest_first(a: &FeedItem, b: &FeedItem) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
        .then_with(|| b.kind.as_str().cmp(a.kind.as_str()))
}

/// `max(1, ceil(total / PAGE_SIZE))`
#[must_use]
pub fn total_pages(total: usize) -> u64 {
    let pages = total.div_ceil(PAGE_SIZE).max(1);
    u64::try_from(pages).unwrap_or(u64::MAX)
}

/// Slices out a 1-based page. Pages past the end come back empty.
#[must_use]
pub fn paginate(items: Vec<FeedItem>, page: u64) -> FeedPage {
    let total_pages = total_pages(items.len());

    let start = usize::try_from(page.saturating_sub(1))
        .ok()
        .and_then(|p| p.checked_mul(PAGE_SIZE));

    let items = match start {
        Some(start) if start < items.len() => {
            items.into_iter().skip(start).take(PAGE_SIZE).collect()
        }
        _ => Vec::new(),
    };

    FeedPage {
        items,
        page,
        total_pages,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn item(id: i32, kind: EntryKind, secs: i64) -> FeedItem {
        FeedItem {
            id,
            kind,
            title: format!("{kind} {id}"),
            snippet: None,
            image_url: None,
            created_at: at(secs),
        }
    }

    fn items(n: usize) -> Vec<FeedItem> {
        (0..n)
            .map(|i| item(i32::try_from(i).unwrap(), EntryKind::Search, 0))
            .collect()
    }

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(20), 2);
        assert_eq!(total_pages(21), 3);
    }

    #[test]
    fn paginate_slices_pages() {
        let page = paginate(items(23), 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);

        let page = paginate(items(23), 1);
        assert_eq!(page.items.len(), 10);
    }

    #[test]
    fn paginate_out_of_range_is_empty() {
        let page = paginate(items(5), 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let page = paginate(Vec::new(), 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let page = paginate(items(5), u64::MAX);
        assert!(page.items.is_empty());
    }

    #[test]
    fn merge_orders_newest_first() {
        let merged = merge(
            vec![item(1, EntryKind::Search, 10)],
            vec![item(1, EntryKind::Image, 20)],
        );
        assert_eq!(merged[0].kind, EntryKind::Image);
        assert_eq!(merged[1].kind, EntryKind::Search);
    }

    #[test]
    fn merge_breaks_ties_by_id_descending() {
        let merged = merge(
            vec![item(3, EntryKind::Search, 5), item(7, EntryKind::Search, 5)],
            vec![item(5, EntryKind::Image, 5)],
        );
        let ids: Vec<i32> = merged.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![7, 5, 3]);
    }

    #[test]
    fn snippet_prefers_title_then_summary() {
        let json = r#"[{"title":"Rust","url":"u","summary":"s"}]"#;
        assert_eq!(search_snippet(Some(json)).as_deref(), Some("Rust"));

        let json = r#"[{"title":"","summary":"only summary"}]"#;
        assert_eq!(search_snippet(Some(json)).as_deref(), Some("only summary"));
    }

    #[test]
    fn snippet_tolerates_bad_content() {
        assert_eq!(search_snippet(None), None);
        assert_eq!(search_snippet(Some("")), None);
        assert_eq!(search_snippet(Some("not json")), None);
        assert_eq!(search_snippet(Some(r#"{"title":"x"}"#)), None);
        assert_eq!(search_snippet(Some("[]")), None);
        assert_eq!(search_snippet(Some(r#"["plain"]"#)), None);
        assert_eq!(search_snippet(Some(r#"[{"title":5}]"#)), None);
    }

    #[test]
    fn detail_images_synthesizes_from_url() {
        let images = detail_images(Some("[]"), Some("http://x/a.png"));
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["url"], "http://x/a.png");

        assert!(detail_images(Some("[]"), None).is_empty());
        assert_eq!(detail_images(Some("garbage"), Some("http://x/b.png")).len(), 1);
    }

    #[test]
    fn detail_images_keeps_stored_records() {
        let meta = r#"[{"url":"http://x/a.png"},{"url":"http://x/b.png"}]"#;
        let images = detail_images(Some(meta), Some("http://x/a.png"));
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["url"], "http://x/a.png");
    }

    #[test]
    fn representative_url_checks_fallback_key() {
        let images = vec![serde_json::json!({"image_url": "http://x/c.png"})];
        assert_eq!(representative_url(&images).as_deref(), Some("http://x/c.png"));

        let images = vec![serde_json::json!({"url": "http://x/a.png", "image_url": "http://x/c.png"})];
        assert_eq!(representative_url(&images).as_deref(), Some("http://x/a.png"));

        assert_eq!(representative_url(&[]), None);
        assert_eq!(representative_url(&[serde_json::json!("http://x")]), None);
    }

    #[test]
    fn titles_fall_back_when_empty() {
        assert_eq!(search_title(Some("rust")), "Results for: rust");
        assert_eq!(search_title(Some("")), "Results for: untitled");
        assert_eq!(image_title(None), "Image");
    }
}
