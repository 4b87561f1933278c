use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::CampusEvent;
use crate::utils::date;
use crate::utils::error::{AppError, AppResult};

pub struct EventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EventRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Tüm etkinlikleri tarih sırasıyla getir
    pub fn find_all(&self) -> AppResult<Vec<CampusEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, location, event_date, organizer
             FROM events ORDER BY event_date",
        )?;

        let events = stmt
            .query_map([], |row| Ok(Self::row_to_event(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(events)
    }

    /// Bugünden itibaren yaklaşan etkinlikler
    pub fn upcoming(&self, today: NaiveDate) -> AppResult<Vec<CampusEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, location, event_date, organizer
             FROM events
             WHERE event_date >= ?
             ORDER BY event_date",
        )?;

        let day_start = date::format_datetime(today.and_hms_opt(0, 0, 0).unwrap_or_default());
        let events = stmt
            .query_map([day_start], |row| Ok(Self::row_to_event(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(events)
    }

    /// Yeni etkinlik oluştur
    pub fn create(&self, event: &mut CampusEvent) -> AppResult<i64> {
        event.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO events (title, description, location, event_date, organizer)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.title,
                event.description,
                event.location,
                date::format_datetime(event.event_date),
                event.organizer,
            ],
        )?;

        let id = conn.last_insert_rowid();
        event.id = Some(id);

        Ok(id)
    }

    /// Etkinliği güncelle
    pub fn update(&self, event: &CampusEvent) -> AppResult<()> {
        let id = event
            .id
            .ok_or_else(|| AppError::validation("Etkinliğin ID'si yok"))?;
        event.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE events SET
                title = ?1, description = ?2, location = ?3, event_date = ?4, organizer = ?5
             WHERE id = ?6",
            params![
                event.title,
                event.description,
                event.location,
                date::format_datetime(event.event_date),
                event.organizer,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Etkinlik {}", id)));
        }

        Ok(())
    }

    /// Etkinliği sil
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM events WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Etkinlik {}", id)));
        }

        Ok(())
    }

    fn row_to_event(row: &Row) -> Option<CampusEvent> {
        let event_date = date::parse_datetime(&row.get::<_, String>(4).ok()?)?;

        Some(CampusEvent {
            id: row.get(0).ok(),
            title: row.get(1).unwrap_or_default(),
            description: row.get(2).unwrap_or_default(),
            location: row.get(3).unwrap_or_default(),
            event_date,
            organizer: row.get(5).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn event(title: &str, date: &str) -> CampusEvent {
        CampusEvent {
            id: None,
            title: title.into(),
            description: String::new(),
            location: "Amfi".into(),
            event_date: date::parse_datetime(date).unwrap(),
            organizer: "Kulüp".into(),
        }
    }

    #[test]
    fn test_upcoming_includes_today() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.events();

        repo.create(&mut event("Dün", "2025-09-14T18:00:00")).unwrap();
        repo.create(&mut event("Bugün akşam", "2025-09-15T20:00:00")).unwrap();
        repo.create(&mut event("Yarın", "2025-09-16T12:00:00")).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let upcoming = repo.upcoming(today).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].title, "Bugün akşam");
    }

    #[test]
    fn test_update_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.events();

        let mut e = event("Konser", "2025-10-01T19:00:00");
        let id = repo.create(&mut e).unwrap();

        e.location = "Açık hava".into();
        repo.update(&e).unwrap();
        assert_eq!(repo.find_all().unwrap()[0].location, "Açık hava");

        repo.delete(id).unwrap();
        assert!(repo.find_all().unwrap().is_empty());
        assert!(matches!(repo.delete(id).unwrap_err(), AppError::NotFound(_)));
    }
}
