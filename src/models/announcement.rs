use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Duyuru; beğeni ve yorum sayıları listelemede türetilir,
/// `is_liked` yalnızca bir öğrenci kimliğiyle listelenince dolar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Option<i64>,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub created_at: Option<NaiveDateTime>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

impl Announcement {
    pub fn new(owner: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            owner: owner.into(),
            title: title.into(),
            description: description.into(),
            created_at: None,
            likes_count: 0,
            comments_count: 0,
            is_liked: false,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Duyuru başlığı boş olamaz"));
        }
        Ok(())
    }
}

/// Duyuru yorumu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementComment {
    pub id: Option<i64>,
    pub announcement_id: i64,
    pub student_id: i64,
    pub user_name: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
}

impl AnnouncementComment {
    pub fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::validation("Yorum boş olamaz"));
        }
        Ok(())
    }
}
