use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{Announcement, AnnouncementComment};
use crate::utils::error::{AppError, AppResult};

pub struct AnnouncementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AnnouncementRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Duyuruları en yeniden eskiye listele. Öğrenci kimliği verilirse
    /// `is_liked` o öğrenciye göre dolar.
    pub fn list(&self, viewer: Option<i64>) -> AppResult<Vec<Announcement>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT a.id, a.owner, a.title, a.description, a.created_at,
                    (SELECT COUNT(*) FROM announcement_likes l WHERE l.announcement_id = a.id),
                    (SELECT COUNT(*) FROM announcement_comments c WHERE c.announcement_id = a.id),
                    EXISTS(SELECT 1 FROM announcement_likes l
                           WHERE l.announcement_id = a.id AND l.student_id = ?1)
             FROM announcements a
             ORDER BY a.created_at DESC, a.id DESC",
        )?;

        let announcements = stmt
            .query_map([viewer.unwrap_or(-1)], |row| Ok(Self::row_to_announcement(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(announcements)
    }

    /// En yeni duyurular (bildirim motoru için)
    pub fn recent(&self, limit: i64) -> AppResult<Vec<Announcement>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT a.id, a.owner, a.title, a.description, a.created_at,
                    0, 0, 0
             FROM announcements a
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT ?",
        )?;

        let announcements = stmt
            .query_map([limit], |row| Ok(Self::row_to_announcement(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(announcements)
    }

    /// Yeni duyuru oluştur
    pub fn create(&self, announcement: &mut Announcement) -> AppResult<i64> {
        announcement.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO announcements (owner, title, description) VALUES (?1, ?2, ?3)",
            params![announcement.owner, announcement.title, announcement.description],
        )?;

        let id = conn.last_insert_rowid();
        announcement.id = Some(id);

        Ok(id)
    }

    /// Duyuruyu sil (yorumlar ve beğeniler CASCADE ile gider)
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM announcements WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Duyuru {}", id)));
        }

        Ok(())
    }

    /// Duyurunun yorumlarını eskiden yeniye getir
    pub fn comments_for(&self, announcement_id: i64) -> AppResult<Vec<AnnouncementComment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, announcement_id, student_id, user_name, content, created_at
             FROM announcement_comments
             WHERE announcement_id = ?
             ORDER BY created_at, id",
        )?;

        let comments = stmt
            .query_map([announcement_id], |row| {
                Ok(AnnouncementComment {
                    id: row.get(0).ok(),
                    announcement_id: row.get(1).unwrap_or_default(),
                    student_id: row.get(2).unwrap_or_default(),
                    user_name: row.get(3).unwrap_or_default(),
                    content: row.get(4).unwrap_or_default(),
                    created_at: Self::parse_timestamp(row.get::<_, String>(5).ok()),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(comments)
    }

    /// Yeni yorum oluştur
    pub fn create_comment(&self, comment: &mut AnnouncementComment) -> AppResult<i64> {
        comment.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO announcement_comments (announcement_id, student_id, user_name, content)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                comment.announcement_id,
                comment.student_id,
                comment.user_name,
                comment.content,
            ],
        )?;

        let id = conn.last_insert_rowid();
        comment.id = Some(id);

        Ok(id)
    }

    /// Beğeni aç/kapa: varsa kaldırır, yoksa ekler.
    /// Yeni beğeni durumunu döner.
    pub fn toggle_like(&self, announcement_id: i64, student_id: i64) -> AppResult<bool> {
        let conn = self.conn.lock().unwrap();

        let is_liked: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM announcement_likes
                           WHERE announcement_id = ?1 AND student_id = ?2)",
            params![announcement_id, student_id],
            |row| row.get(0),
        )?;

        if is_liked {
            conn.execute(
                "DELETE FROM announcement_likes WHERE announcement_id = ?1 AND student_id = ?2",
                params![announcement_id, student_id],
            )?;
            Ok(false)
        } else {
            conn.execute(
                "INSERT INTO announcement_likes (announcement_id, student_id) VALUES (?1, ?2)",
                params![announcement_id, student_id],
            )?;
            Ok(true)
        }
    }

    fn row_to_announcement(row: &Row) -> Announcement {
        Announcement {
            id: row.get(0).ok(),
            owner: row.get(1).unwrap_or_default(),
            title: row.get(2).unwrap_or_default(),
            description: row.get(3).unwrap_or_default(),
            created_at: Self::parse_timestamp(row.get::<_, String>(4).ok()),
            likes_count: row.get(5).unwrap_or_default(),
            comments_count: row.get(6).unwrap_or_default(),
            is_liked: row.get::<_, i32>(7).unwrap_or(0) != 0,
        }
    }

    /// SQLite'ın datetime('now') biçimi ("YYYY-MM-DD HH:MM:SS")
    fn parse_timestamp(s: Option<String>) -> Option<NaiveDateTime> {
        s.and_then(|s| crate::utils::date::parse_datetime(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_list_with_derived_counts() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.announcements();

        let mut a = Announcement::new("Öğrenci İşleri", "Kayıt tarihleri", "Detaylar...");
        let announcement_id = repo.create(&mut a).unwrap();

        let mut comment = AnnouncementComment {
            id: None,
            announcement_id,
            student_id: 7,
            user_name: "Ayşe Yılmaz".into(),
            content: "Teşekkürler".into(),
            created_at: None,
        };
        repo.create_comment(&mut comment).unwrap();
        repo.toggle_like(announcement_id, 7).unwrap();

        let list = repo.list(Some(7)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].likes_count, 1);
        assert_eq!(list[0].comments_count, 1);
        assert!(list[0].is_liked);

        // Başka öğrenci için is_liked dolu olmamalı
        let list = repo.list(Some(8)).unwrap();
        assert!(!list[0].is_liked);
        let list = repo.list(None).unwrap();
        assert!(!list[0].is_liked);
    }

    #[test]
    fn test_like_toggle_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.announcements();

        let mut a = Announcement::new("Kulüp", "Turnuva", "");
        let id = repo.create(&mut a).unwrap();

        assert!(repo.toggle_like(id, 1).unwrap());
        assert_eq!(repo.list(None).unwrap()[0].likes_count, 1);

        assert!(!repo.toggle_like(id, 1).unwrap());
        assert_eq!(repo.list(None).unwrap()[0].likes_count, 0);
    }

    #[test]
    fn test_recent_limit() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.announcements();

        for i in 0..8 {
            let mut a = Announcement::new("Rektörlük", format!("Duyuru {}", i), "");
            repo.create(&mut a).unwrap();
        }

        let recent = repo.recent(5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "Duyuru 7");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.announcements();

        let mut a = Announcement::new("Kulüp", "Turnuva", "");
        let id = repo.create(&mut a).unwrap();

        let mut comment = AnnouncementComment {
            id: None,
            announcement_id: id,
            student_id: 1,
            user_name: "Ayşe".into(),
            content: "   ".into(),
            created_at: None,
        };
        let err = repo.create_comment(&mut comment).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
