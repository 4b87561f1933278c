use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Kampüs etkinliği (konser, söyleşi, turnuva...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusEvent {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: NaiveDateTime,
    pub organizer: String,
}

impl CampusEvent {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Etkinlik başlığı boş olamaz"));
        }
        Ok(())
    }
}
