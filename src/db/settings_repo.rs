use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::models::NotificationSettings;
use crate::utils::error::AppResult;

pub struct SettingsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Öğrencinin bildirim ayarlarını getir; kayıt yoksa varsayılanlar
    /// (hepsi açık) döner.
    pub fn get(&self, student_id: i64) -> AppResult<NotificationSettings> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT class_reminders, event_alerts, cafeteria_alerts, announcement_alerts
             FROM user_settings WHERE student_id = ?",
            [student_id],
            |row| {
                Ok(NotificationSettings {
                    class_reminders: row.get::<_, i32>(0)? != 0,
                    event_alerts: row.get::<_, i32>(1)? != 0,
                    cafeteria_alerts: row.get::<_, i32>(2)? != 0,
                    announcement_alerts: row.get::<_, i32>(3)? != 0,
                })
            },
        );

        Ok(result.unwrap_or_default())
    }

    /// Öğrencinin bildirim ayarlarını kaydet
    pub fn save(&self, student_id: i64, settings: &NotificationSettings) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO user_settings
                (student_id, class_reminders, event_alerts, cafeteria_alerts, announcement_alerts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                student_id,
                settings.class_reminders as i32,
                settings.event_alerts as i32,
                settings.cafeteria_alerts as i32,
                settings.announcement_alerts as i32,
            ],
        )?;

        Ok(())
    }
}
