//! `SeaORM` implementation of the `DashboardService` trait.

use async_trait::async_trait;

use crate::db::{CleanupCounts, Store};
use crate::domain::feed::{self, FeedItem, FeedPage};
use crate::domain::{EntryKind, UserId};
use crate::services::dashboard_service::{
    DashboardError, DashboardService, EntryDetail, ImageSave, ListQuery, SavePayload, SearchSave,
};

pub struct SeaOrmDashboardService {
    store: Store,
}

impl SeaOrmDashboardService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn save_search(&self, owner: UserId, save: SearchSave) -> Result<i32, DashboardError> {
        let query = save.query.unwrap_or_default();
        let results = serde_json::to_string(&save.results.unwrap_or_default())
            .map_err(|e| DashboardError::InvalidInput(e.to_string()))?;

        let row = self.store.add_search_entry(owner, &query, &results).await?;
        Ok(row.id)
    }

    async fn save_image(&self, owner: UserId, save: ImageSave) -> Result<i32, DashboardError> {
        let prompt = save.prompt.unwrap_or_default();
        let images = save.images.unwrap_or_default();
        let image_url = feed::representative_url(&images);
        let meta = serde_json::to_string(&images)
            .map_err(|e| DashboardError::InvalidInput(e.to_string()))?;

        let row = self
            .store
            .add_image_entry(owner, &prompt, image_url.as_deref(), &meta)
            .await?;
        Ok(row.id)
    }
}

#[async_trait]
impl DashboardService for SeaOrmDashboardService {
    async fn list(&self, owner: UserId, query: &ListQuery) -> Result<FeedPage, DashboardError> {
        if query.page == 0 {
            return Err(DashboardError::InvalidInput(
                "page must be at least 1".to_string(),
            ));
        }

        let filter = query.q.as_deref().filter(|q| !q.is_empty());

        let search = if query.kind.includes(EntryKind::Search) {
            self.store
                .list_search_entries(owner, filter)
                .await?
                .iter()
                .map(FeedItem::from)
                .collect()
        } else {
            Vec::new()
        };

        let image = if query.kind.includes(EntryKind::Image) {
            self.store
                .list_image_entries(owner, filter)
                .await?
                .iter()
                .map(FeedItem::from)
                .collect()
        } else {
            Vec::new()
        };

        Ok(feed::paginate(feed::merge(search, image), query.page))
    }

    async fn get(
        &self,
        owner: UserId,
        id: i32,
        kind: EntryKind,
    ) -> Result<EntryDetail, DashboardError> {
        match kind {
            EntryKind::Search => {
                let row = self
                    .store
                    .get_search_entry(id, owner)
                    .await?
                    .ok_or(DashboardError::NotFound)?;

                Ok(EntryDetail::Search {
                    id: row.id,
                    title: feed::search_title(row.query.as_deref()),
                    results: feed::parse_records(row.results_json.as_deref()),
                    query: row.query.unwrap_or_default(),
                    created_at: row.created_at,
                })
            }
            EntryKind::Image => {
                let row = self
                    .store
                    .get_image_entry(id, owner)
                    .await?
                    .ok_or(DashboardError::NotFound)?;

                Ok(EntryDetail::Image {
                    id: row.id,
                    title: feed::image_title(row.prompt.as_deref()),
                    images: feed::detail_images(row.meta.as_deref(), row.image_url.as_deref()),
                    prompt: row.prompt.unwrap_or_default(),
                    created_at: row.created_at,
                })
            }
        }
    }

    async fn save(&self, owner: UserId, payload: SavePayload) -> Result<i32, DashboardError> {
        let (kind, id) = match payload {
            SavePayload::Search(save) => (EntryKind::Search, self.save_search(owner, save).await?),
            SavePayload::Image(save) => (EntryKind::Image, self.save_image(owner, save).await?),
        };

        tracing::debug!(user_id = %owner, entry_id = id, kind = %kind, "Saved dashboard entry");
        Ok(id)
    }

    async fn delete(&self, owner: UserId, id: i32, kind: EntryKind) -> Result<(), DashboardError> {
        let deleted = match kind {
            EntryKind::Search => self.store.delete_search_entry(id, owner).await?,
            EntryKind::Image => self.store.delete_image_entry(id, owner).await?,
        };

        if deleted {
            Ok(())
        } else {
            Err(DashboardError::NotFound)
        }
    }

    async fn cleanup_empty(&self, owner: UserId) -> Result<CleanupCounts, DashboardError> {
        let counts = self.store.delete_empty_entries(owner).await?;

        if counts.search > 0 || counts.image > 0 {
            tracing::info!(
                user_id = %owner,
                search = counts.search,
                image = counts.image,
                "Removed untitled dashboard entries"
            );
        }

        Ok(counts)
    }
}
