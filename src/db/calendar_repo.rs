use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{CalendarEntry, CalendarEntryType};
use crate::utils::date;
use crate::utils::error::{AppError, AppResult};

pub struct CalendarRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CalendarRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    const COLUMNS: &'static str =
        "id, title, description, event_date, end_date, event_type, icon, course_code";

    /// Tüm takvim kayıtlarını tarih sırasıyla getir
    pub fn find_all(&self) -> AppResult<Vec<CalendarEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM academic_calendar ORDER BY event_date",
            Self::COLUMNS
        ))?;

        let entries = stmt
            .query_map([], |row| Ok(Self::row_to_entry(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(entries)
    }

    /// Bugünden itibaren yaklaşan kayıtlar
    pub fn upcoming(&self, today: NaiveDate) -> AppResult<Vec<CalendarEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM academic_calendar WHERE event_date >= ? ORDER BY event_date",
            Self::COLUMNS
        ))?;

        let entries = stmt
            .query_map([date::format_date(today)], |row| Ok(Self::row_to_entry(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(entries)
    }

    /// Yeni takvim kaydı oluştur
    pub fn create(&self, entry: &mut CalendarEntry) -> AppResult<i64> {
        if entry.title.trim().is_empty() {
            return Err(AppError::validation("Takvim başlığı boş olamaz"));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO academic_calendar (title, description, event_date, end_date, event_type, icon, course_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.title,
                entry.description,
                date::format_date(entry.event_date),
                entry.end_date.map(date::format_date),
                entry.entry_type.to_string(),
                entry.icon,
                entry.course_code,
            ],
        )?;

        let id = conn.last_insert_rowid();
        entry.id = Some(id);

        Ok(id)
    }

    /// Takvim kaydını güncelle
    pub fn update(&self, entry: &CalendarEntry) -> AppResult<()> {
        let id = entry
            .id
            .ok_or_else(|| AppError::validation("Takvim kaydının ID'si yok"))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE academic_calendar SET
                title = ?1, description = ?2, event_date = ?3, end_date = ?4,
                event_type = ?5, icon = ?6, course_code = ?7
             WHERE id = ?8",
            params![
                entry.title,
                entry.description,
                date::format_date(entry.event_date),
                entry.end_date.map(date::format_date),
                entry.entry_type.to_string(),
                entry.icon,
                entry.course_code,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Takvim kaydı {}", id)));
        }

        Ok(())
    }

    /// Takvim kaydını sil
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM academic_calendar WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Takvim kaydı {}", id)));
        }

        Ok(())
    }

    fn row_to_entry(row: &Row) -> Option<CalendarEntry> {
        let event_date = date::parse_date(&row.get::<_, String>(3).ok()?)?;
        let end_date = row
            .get::<_, Option<String>>(4)
            .ok()
            .flatten()
            .and_then(|s| date::parse_date(&s));

        Some(CalendarEntry {
            id: row.get(0).ok(),
            title: row.get(1).unwrap_or_default(),
            description: row.get(2).unwrap_or_default(),
            event_date,
            end_date,
            entry_type: CalendarEntryType::from_db_str(
                &row.get::<_, String>(5).unwrap_or_default(),
            ),
            icon: row.get(6).unwrap_or_default(),
            course_code: row.get(7).ok().flatten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn entry(title: &str, date: NaiveDate) -> CalendarEntry {
        CalendarEntry {
            id: None,
            title: title.into(),
            description: String::new(),
            event_date: date,
            end_date: None,
            entry_type: CalendarEntryType::Semester,
            icon: "calendar".into(),
            course_code: None,
        }
    }

    #[test]
    fn test_crud_and_ordering() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.calendar();

        let mut late = entry("Final haftası", NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let mut early = entry("Dönem başı", NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        repo.create(&mut late).unwrap();
        repo.create(&mut early).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Dönem başı");

        let mut updated = all[1].clone();
        updated.entry_type = CalendarEntryType::Exam;
        repo.update(&updated).unwrap();
        assert_eq!(
            repo.find_all().unwrap()[1].entry_type,
            CalendarEntryType::Exam
        );

        repo.delete(updated.id.unwrap()).unwrap();
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_upcoming_filters_past() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.calendar();

        let mut past = entry("Geçmiş", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let mut future = entry("Gelecek", NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        repo.create(&mut past).unwrap();
        repo.create(&mut future).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let upcoming = repo.upcoming(today).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Gelecek");
    }
}
