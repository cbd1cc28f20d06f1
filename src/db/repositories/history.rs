use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;

use crate::domain::UserId;
use crate::entities::{image_history, prelude::*, search_history};

/// Rows removed by a cleanup, per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupCounts {
    pub search: u64,
    pub image: u64,
}

/// Case-insensitive substring match. SQLite's `LOWER` and `LIKE` only fold
/// ASCII, so both sides are lowercased here instead.
#[must_use]
pub fn contains_ci(text: Option<&str>, term: &str) -> bool {
    text.is_some_and(|text| text.to_lowercase().contains(&term.to_lowercase()))
}

fn blank<C: ColumnTrait>(column: C) -> Condition {
    Condition::any().add(column.is_null()).add(column.eq(""))
}

pub struct SearchHistoryRepository {
    conn: DatabaseConnection,
}

impl SearchHistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        user_id: UserId,
        query: &str,
        results_json: &str,
        created_at: DateTime<Utc>,
    ) -> Result<search_history::Model> {
        let active = search_history::ActiveModel {
            user_id: Set(user_id.value()),
            query: Set(Some(query.to_string())),
            results_json: Set(Some(results_json.to_string())),
            created_at: Set(created_at),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert search history entry")
    }

    pub async fn list_for_user(
        &self,
        user_id: UserId,
        filter: Option<&str>,
    ) -> Result<Vec<search_history::Model>> {
        let rows = SearchHistory::find()
            .filter(search_history::Column::UserId.eq(user_id.value()))
            .order_by_desc(search_history::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list search history")?;

        Ok(match filter.filter(|t| !t.is_empty()) {
            Some(term) => rows
                .into_iter()
                .filter(|row| contains_ci(row.query.as_deref(), term))
                .collect(),
            None => rows,
        })
    }

    pub async fn get(&self, id: i32, user_id: UserId) -> Result<Option<search_history::Model>> {
        SearchHistory::find_by_id(id)
            .filter(search_history::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query search history entry")
    }

    pub async fn delete(&self, id: i32, user_id: UserId) -> Result<bool> {
        let result = SearchHistory::delete_many()
            .filter(search_history::Column::Id.eq(id))
            .filter(search_history::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_empty(&self, user_id: UserId) -> Result<u64> {
        let result = SearchHistory::delete_many()
            .filter(search_history::Column::UserId.eq(user_id.value()))
            .filter(blank(search_history::Column::Query))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

pub struct ImageHistoryRepository {
    conn: DatabaseConnection,
}

impl ImageHistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        user_id: UserId,
        prompt: &str,
        image_url: Option<&str>,
        meta_json: &str,
        created_at: DateTime<Utc>,
    ) -> Result<image_history::Model> {
        let active = image_history::ActiveModel {
            user_id: Set(user_id.value()),
            prompt: Set(Some(prompt.to_string())),
            image_url: Set(image_url.map(ToString::to_string)),
            meta: Set(Some(meta_json.to_string())),
            created_at: Set(created_at),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert image history entry")
    }

    pub async fn list_for_user(
        &self,
        user_id: UserId,
        filter: Option<&str>,
    ) -> Result<Vec<image_history::Model>> {
        let rows = ImageHistory::find()
            .filter(image_history::Column::UserId.eq(user_id.value()))
            .order_by_desc(image_history::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list image history")?;

        Ok(match filter.filter(|t| !t.is_empty()) {
            Some(term) => rows
                .into_iter()
                .filter(|row| contains_ci(row.prompt.as_deref(), term))
                .collect(),
            None => rows,
        })
    }

    pub async fn get(&self, id: i32, user_id: UserId) -> Result<Option<image_history::Model>> {
        ImageHistory::find_by_id(id)
            .filter(image_history::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query image history entry")
    }

    pub async fn delete(&self, id: i32, user_id: UserId) -> Result<bool> {
        let result = ImageHistory::delete_many()
            .filter(image_history::Column::Id.eq(id))
            .filter(image_history::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_empty(&self, user_id: UserId) -> Result<u64> {
        let result = ImageHistory::delete_many()
            .filter(image_history::Column::UserId.eq(user_id.value()))
            .filter(blank(image_history::Column::Prompt))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
