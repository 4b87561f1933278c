use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Bölüm (örn. "BM" / Bilgisayar Mühendisliği)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub faculty: String,
}

impl Department {
    pub fn new(code: impl Into<String>, name: impl Into<String>, faculty: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            faculty: faculty.into(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("Bölüm kodu boş olamaz"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Bölüm adı boş olamaz"));
        }
        Ok(())
    }
}
