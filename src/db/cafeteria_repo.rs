use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{MenuCategory, MenuItem, Snack};
use crate::utils::date;
use crate::utils::error::{AppError, AppResult};

pub struct CafeteriaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CafeteriaRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Günün menüsünü getir
    pub fn menu_by_date(&self, date: NaiveDate) -> AppResult<Vec<MenuItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, category, available, menu_date
             FROM cafeteria_menu
             WHERE menu_date = ?
             ORDER BY category, name",
        )?;

        let items = stmt
            .query_map([date::format_date(date)], |row| Ok(Self::row_to_item(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(items)
    }

    /// Yeni menü satırı oluştur
    pub fn create_menu_item(&self, item: &mut MenuItem) -> AppResult<i64> {
        item.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO cafeteria_menu (name, description, price, category, available, menu_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.name,
                item.description,
                item.price,
                item.category.to_string(),
                item.available as i32,
                date::format_date(item.menu_date),
            ],
        )?;

        let id = conn.last_insert_rowid();
        item.id = Some(id);

        Ok(id)
    }

    /// Menü satırını güncelle
    pub fn update_menu_item(&self, item: &MenuItem) -> AppResult<()> {
        let id = item
            .id
            .ok_or_else(|| AppError::validation("Menü satırının ID'si yok"))?;
        item.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE cafeteria_menu SET
                name = ?1, description = ?2, price = ?3, category = ?4,
                available = ?5, menu_date = ?6
             WHERE id = ?7",
            params![
                item.name,
                item.description,
                item.price,
                item.category.to_string(),
                item.available as i32,
                date::format_date(item.menu_date),
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Menü satırı {}", id)));
        }

        Ok(())
    }

    /// Menü satırını sil
    pub fn delete_menu_item(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM cafeteria_menu WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Menü satırı {}", id)));
        }

        Ok(())
    }

    /// Atıştırmalıkları getir; tarihten bağımsız, her gün gösterilir
    pub fn snacks(&self) -> AppResult<Vec<Snack>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, category, available
             FROM cafeteria_snacks ORDER BY name",
        )?;

        let snacks = stmt
            .query_map([], |row| {
                Ok(Snack {
                    id: row.get(0).ok(),
                    name: row.get(1).unwrap_or_default(),
                    description: row.get(2).unwrap_or_default(),
                    price: row.get(3).unwrap_or_default(),
                    category: row.get(4).ok().flatten(),
                    available: row.get::<_, i32>(5).unwrap_or(1) != 0,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(snacks)
    }

    /// Yeni atıştırmalık oluştur
    pub fn create_snack(&self, snack: &mut Snack) -> AppResult<i64> {
        snack.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO cafeteria_snacks (name, description, price, category, available)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                snack.name,
                snack.description,
                snack.price,
                snack.category,
                snack.available as i32,
            ],
        )?;

        let id = conn.last_insert_rowid();
        snack.id = Some(id);

        Ok(id)
    }

    /// Atıştırmalığı güncelle
    pub fn update_snack(&self, snack: &Snack) -> AppResult<()> {
        let id = snack
            .id
            .ok_or_else(|| AppError::validation("Atıştırmalığın ID'si yok"))?;
        snack.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE cafeteria_snacks SET
                name = ?1, description = ?2, price = ?3, category = ?4, available = ?5
             WHERE id = ?6",
            params![
                snack.name,
                snack.description,
                snack.price,
                snack.category,
                snack.available as i32,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Atıştırmalık {}", id)));
        }

        Ok(())
    }

    /// Atıştırmalığı sil
    pub fn delete_snack(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM cafeteria_snacks WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Atıştırmalık {}", id)));
        }

        Ok(())
    }

    fn row_to_item(row: &Row) -> Option<MenuItem> {
        let menu_date = date::parse_date(&row.get::<_, String>(6).ok()?)?;

        Some(MenuItem {
            id: row.get(0).ok(),
            name: row.get(1).unwrap_or_default(),
            description: row.get(2).unwrap_or_default(),
            price: row.get(3).unwrap_or_default(),
            category: MenuCategory::from_db_str(&row.get::<_, String>(4).unwrap_or_default()),
            available: row.get::<_, i32>(5).unwrap_or(1) != 0,
            menu_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn item(name: &str, category: MenuCategory, date: NaiveDate) -> MenuItem {
        MenuItem {
            id: None,
            name: name.into(),
            description: String::new(),
            price: 45.0,
            category,
            available: true,
            menu_date: date,
        }
    }

    #[test]
    fn test_menu_by_date() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.cafeteria();

        let monday = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 9, 16).unwrap();

        repo.create_menu_item(&mut item("Mercimek çorbası", MenuCategory::Side, monday))
            .unwrap();
        repo.create_menu_item(&mut item("Karnıyarık", MenuCategory::Main, monday))
            .unwrap();
        repo.create_menu_item(&mut item("İskender", MenuCategory::Main, tuesday))
            .unwrap();

        let menu = repo.menu_by_date(monday).unwrap();
        assert_eq!(menu.len(), 2);
        assert!(menu.iter().any(|i| i.name == "Karnıyarık"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.cafeteria();

        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let mut bad = item("Çay", MenuCategory::Drink, date);
        bad.price = -1.0;

        let err = repo.create_menu_item(&mut bad).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_snack_crud() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.cafeteria();

        let mut snack = Snack {
            id: None,
            name: "Simit".into(),
            description: String::new(),
            price: 15.0,
            category: None,
            available: true,
        };
        let id = repo.create_snack(&mut snack).unwrap();

        snack.available = false;
        repo.update_snack(&snack).unwrap();

        let snacks = repo.snacks().unwrap();
        assert_eq!(snacks.len(), 1);
        assert!(!snacks[0].available);

        repo.delete_snack(id).unwrap();
        assert!(repo.snacks().unwrap().is_empty());
    }
}
