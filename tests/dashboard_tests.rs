use chrono::{DateTime, Duration, TimeZone, Utc};
use content_explorer::config::SecurityConfig;
use content_explorer::db::Store;
use content_explorer::domain::{EntryKind, KindFilter, Role, UserId};
use content_explorer::entities::{image_history, search_history};
use content_explorer::services::dashboard_service::ImageSave;
use content_explorer::services::{
    DashboardError, DashboardService, EntryDetail, ListQuery, SavePayload, SeaOrmDashboardService,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

fn cheap_hashing() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
}

async fn setup() -> (Store, SeaOrmDashboardService, UserId) {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let user = store
        .create_user("ann@example.com", "secret123", Role::User, &cheap_hashing())
        .await
        .unwrap()
        .unwrap();
    let service = SeaOrmDashboardService::new(store.clone());
    (store, service, user.id)
}

fn list_query(kind: KindFilter, page: u64, q: Option<&str>) -> ListQuery {
    ListQuery {
        kind,
        page,
        q: q.map(ToString::to_string),
    }
}

#[tokio::test]
async fn test_newer_entry_lists_first() {
    let (store, service, owner) = setup().await;

    store
        .add_search_entry_at(owner, "older", "[]", at(10))
        .await
        .unwrap();
    store
        .add_image_entry_at(owner, "newer", None, "[]", at(20))
        .await
        .unwrap();

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, None))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].kind, EntryKind::Image);
    assert_eq!(page.items[0].title, "newer");
    assert_eq!(page.items[1].kind, EntryKind::Search);
    assert_eq!(page.items[1].title, "Results for: older");
}

#[tokio::test]
async fn test_equal_timestamps_order_by_id() {
    let (store, service, owner) = setup().await;

    for query in ["a", "b", "c"] {
        store
            .add_search_entry_at(owner, query, "[]", at(0))
            .await
            .unwrap();
    }

    let first = service
        .list(owner, &list_query(KindFilter::Search, 1, None))
        .await
        .unwrap();
    let second = service
        .list(owner, &list_query(KindFilter::Search, 1, None))
        .await
        .unwrap();

    let ids: Vec<i32> = first.items.iter().map(|i| i.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
    assert_eq!(ids, second.items.iter().map(|i| i.id).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_pagination() {
    let (store, service, owner) = setup().await;

    for i in 0..23 {
        store
            .add_search_entry_at(owner, &format!("q{i}"), "[]", at(i))
            .await
            .unwrap();
    }

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0].title, "Results for: q22");

    let page = service
        .list(owner, &list_query(KindFilter::All, 3, None))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[2].title, "Results for: q0");

    let page = service
        .list(owner, &list_query(KindFilter::All, 4, None))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 3);

    let empty = service
        .list(owner, &list_query(KindFilter::Image, 1, None))
        .await
        .unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.total_pages, 1);
}

#[tokio::test]
async fn test_page_zero_is_invalid() {
    let (_store, service, owner) = setup().await;

    let result = service
        .list(owner, &list_query(KindFilter::All, 0, None))
        .await;
    assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
}

#[tokio::test]
async fn test_malformed_results_yield_no_snippet() {
    let (store, service, owner) = setup().await;

    let row = store
        .add_search_entry(owner, "broken", "not json")
        .await
        .unwrap();

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items[0].snippet, None);

    let detail = service
        .get(owner, row.id, EntryKind::Search)
        .await
        .unwrap();
    match detail {
        EntryDetail::Search { results, query, .. } => {
            assert!(results.is_empty());
            assert_eq!(query, "broken");
        }
        EntryDetail::Image { .. } => panic!("expected a search detail"),
    }
}

#[tokio::test]
async fn test_representative_url_uses_fallback_key() {
    let (_store, service, owner) = setup().await;

    let payload = SavePayload::from_value(json!({
        "type": "image",
        "prompt": "fallback",
        "images": [{"image_url": "http://x/c.png"}]
    }))
    .unwrap();
    service.save(owner, payload).await.unwrap();

    let page = service
        .list(owner, &list_query(KindFilter::Image, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items[0].image_url.as_deref(), Some("http://x/c.png"));
}

#[tokio::test]
async fn test_detail_synthesizes_image_from_url() {
    let (store, service, owner) = setup().await;

    let row = store
        .add_image_entry(owner, "", Some("http://x/only.png"), "[]")
        .await
        .unwrap();

    let detail = service.get(owner, row.id, EntryKind::Image).await.unwrap();
    match detail {
        EntryDetail::Image {
            images,
            title,
            prompt,
            ..
        } => {
            assert_eq!(images, vec![json!({"url": "http://x/only.png"})]);
            assert_eq!(title, "Image");
            assert_eq!(prompt, "");
        }
        EntryDetail::Search { .. } => panic!("expected an image detail"),
    }

    let page = service
        .list(owner, &list_query(KindFilter::Image, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "untitled");
}

#[tokio::test]
async fn test_filter_treats_wildcards_literally() {
    let (store, service, owner) = setup().await;

    store
        .add_search_entry(owner, "100% pure", "[]")
        .await
        .unwrap();
    store
        .add_search_entry(owner, "100 pure", "[]")
        .await
        .unwrap();
    store
        .add_search_entry(owner, "snake_case", "[]")
        .await
        .unwrap();
    store
        .add_search_entry(owner, "snakeXcase", "[]")
        .await
        .unwrap();

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, Some("100%")))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Results for: 100% pure");

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, Some("E_C")))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_filter_matches_non_ascii_text() {
    let (store, service, owner) = setup().await;

    store
        .add_search_entry(owner, "École normale", "[]")
        .await
        .unwrap();
    store
        .add_image_entry(owner, "Ünicorn", None, "[]")
        .await
        .unwrap();

    for (q, expected) in [
        ("École", 1),
        ("école", 1),
        ("Ünicorn", 1),
        ("ünicorn", 1),
        ("cole", 1),
        ("Émile", 0),
    ] {
        let page = service
            .list(owner, &list_query(KindFilter::All, 1, Some(q)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), expected, "q={q}");
    }
}

#[tokio::test]
async fn test_cleanup_removes_null_text_rows() {
    let (store, service, owner) = setup().await;

    search_history::ActiveModel {
        user_id: Set(owner.value()),
        query: Set(None),
        results_json: Set(None),
        created_at: Set(at(0)),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .unwrap();
    image_history::ActiveModel {
        user_id: Set(owner.value()),
        prompt: Set(None),
        image_url: Set(None),
        meta: Set(None),
        created_at: Set(at(1)),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .unwrap();
    store.add_image_entry(owner, "kept", None, "[]").await.unwrap();

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);

    let counts = service.cleanup_empty(owner).await.unwrap();
    assert_eq!((counts.search, counts.image), (1, 1));

    let page = service
        .list(owner, &list_query(KindFilter::All, 1, None))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "kept");
}

#[tokio::test]
async fn test_cleanup_twice_reports_zero() {
    let (store, service, owner) = setup().await;

    store.add_search_entry(owner, "", "[]").await.unwrap();
    store.add_search_entry(owner, "kept", "[]").await.unwrap();
    service
        .save(owner, SavePayload::Image(ImageSave::default()))
        .await
        .unwrap();

    let first = service.cleanup_empty(owner).await.unwrap();
    assert_eq!((first.search, first.image), (1, 1));

    let second = service.cleanup_empty(owner).await.unwrap();
    assert_eq!((second.search, second.image), (0, 0));
}

#[tokio::test]
async fn test_cleanup_leaves_other_users_alone() {
    let (store, service, owner) = setup().await;
    let other = store
        .create_user("bob@example.com", "secret123", Role::User, &cheap_hashing())
        .await
        .unwrap()
        .unwrap();

    store.add_search_entry(other.id, "", "[]").await.unwrap();

    let counts = service.cleanup_empty(owner).await.unwrap();
    assert_eq!(counts.search, 0);

    let counts = service.cleanup_empty(other.id).await.unwrap();
    assert_eq!(counts.search, 1);
}

#[tokio::test]
async fn test_missing_entry_is_not_found() {
    let (_store, service, owner) = setup().await;

    assert!(matches!(
        service.get(owner, 42, EntryKind::Search).await,
        Err(DashboardError::NotFound)
    ));
    assert!(matches!(
        service.delete(owner, 42, EntryKind::Image).await,
        Err(DashboardError::NotFound)
    ));
}
