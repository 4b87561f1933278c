use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Menü kategorisi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCategory {
    Main,
    Side,
    Dessert,
    Drink,
}

impl MenuCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Main => "Ana yemek",
            Self::Side => "Yan yemek",
            Self::Dessert => "Tatlı",
            Self::Drink => "İçecek",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "side" => Self::Side,
            "dessert" => Self::Dessert,
            "drink" => Self::Drink,
            _ => Self::Main,
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Side => write!(f, "side"),
            Self::Dessert => write!(f, "dessert"),
            Self::Drink => write!(f, "drink"),
        }
    }
}

/// Günlük yemekhane menüsü satırı; tarih başına ürün başına bir kayıt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: MenuCategory,
    pub available: bool,
    pub menu_date: NaiveDate,
}

impl MenuItem {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Ürün adı boş olamaz"));
        }
        if self.price < 0.0 {
            return Err(AppError::validation("Fiyat negatif olamaz"));
        }
        Ok(())
    }
}

/// Kantin atıştırmalığı; tarihten bağımsız, her gün listelenir
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snack {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Option<String>,
    pub available: bool,
}

impl Snack {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Ürün adı boş olamaz"));
        }
        if self.price < 0.0 {
            return Err(AppError::validation("Fiyat negatif olamaz"));
        }
        Ok(())
    }
}
