pub mod schema;
pub mod migrations;
pub mod announcement_repo;
pub mod cafeteria_repo;
pub mod calendar_repo;
pub mod course_repo;
pub mod department_repo;
pub mod enrollment_repo;
pub mod event_repo;
pub mod settings_repo;
pub mod student_repo;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::utils::error::AppResult;

pub use announcement_repo::AnnouncementRepository;
pub use cafeteria_repo::CafeteriaRepository;
pub use calendar_repo::CalendarRepository;
pub use course_repo::CourseRepository;
pub use department_repo::DepartmentRepository;
pub use enrollment_repo::EnrollmentRepository;
pub use event_repo::EventRepository;
pub use settings_repo::SettingsRepository;
pub use student_repo::StudentRepository;

/// Veritabanı sarmalayıcısı; tek bağlantı, thread-safe erişim.
/// Uygulama tek mantıksal iş parçacığında çalışır, kilit yalnızca
/// Arc paylaşımını güvenli kılar.
#[derive(Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Veritabanını aç ya da oluştur
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory veritabanı aç (testler için)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Şema migrasyonlarını çalıştır
    pub fn migrate(&self) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        migrations::run_migrations(&conn)
    }

    pub fn departments(&self) -> DepartmentRepository {
        DepartmentRepository::new(Arc::clone(&self.conn))
    }

    pub fn students(&self) -> StudentRepository {
        StudentRepository::new(Arc::clone(&self.conn))
    }

    pub fn courses(&self) -> CourseRepository {
        CourseRepository::new(Arc::clone(&self.conn))
    }

    pub fn enrollments(&self) -> EnrollmentRepository {
        EnrollmentRepository::new(Arc::clone(&self.conn))
    }

    pub fn calendar(&self) -> CalendarRepository {
        CalendarRepository::new(Arc::clone(&self.conn))
    }

    pub fn announcements(&self) -> AnnouncementRepository {
        AnnouncementRepository::new(Arc::clone(&self.conn))
    }

    pub fn cafeteria(&self) -> CafeteriaRepository {
        CafeteriaRepository::new(Arc::clone(&self.conn))
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(Arc::clone(&self.conn))
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(Arc::clone(&self.conn))
    }

    /// Doğrudan bağlantı erişimi (özel sorgular için)
    pub fn with_connection<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kampus.db");

        {
            let db = Database::open(&path).unwrap();
            db.migrate().unwrap();
            let mut dept = crate::models::Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
            db.departments().create(&mut dept).unwrap();
        }

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        let depts = db.departments().find_all().unwrap();
        assert_eq!(depts.len(), 1);
        assert_eq!(depts[0].code, "BM");
    }
}
