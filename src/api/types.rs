use serde::Serialize;

use crate::db::CleanupCounts;
use crate::domain::EntryKind;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SavedEntryDto {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct DeletedEntryDto {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Serialize)]
pub struct CleanupDto {
    pub deleted: CleanupCounts,
}
