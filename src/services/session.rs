//! Oturum yaşam döngüsü
//!
//! Oturum açan öğrenciyi, bildirim ayarlarını ve bildirim motorunu bir
//! arada tutar. Global durum yerine sunum katmanına açıkça verilen bir
//! nesnedir; oturum kapanınca bildirim durumu onunla birlikte yok olur.

use chrono::NaiveDateTime;

use crate::db::Database;
use crate::models::{NotificationSettings, Student};
use crate::services::notifications::NotificationEngine;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug)]
pub struct Session {
    db: Database,
    student: Student,
    engine: NotificationEngine,
}

impl Session {
    /// Numara + parola ile oturum aç. Öğrencinin kayıtlı bildirim
    /// ayarları motorla birlikte yüklenir.
    pub fn login(db: &Database, student_number: &str, password: &str) -> AppResult<Self> {
        let student = db
            .students()
            .authenticate(student_number, password)?
            .ok_or_else(|| AppError::validation("Öğrenci numarası ya da parola hatalı"))?;

        let student_id = student.id.unwrap_or_default();
        let settings = db.settings().get(student_id)?;
        let engine = NotificationEngine::new(db.clone(), student_id, settings);

        Ok(Self {
            db: db.clone(),
            student,
            engine,
        })
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn notifications(&self) -> &NotificationEngine {
        &self.engine
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationEngine {
        &mut self.engine
    }

    /// Oturum başlangıcındaki ilk tarama (depo hazır olduktan sonra
    /// çağrılır)
    pub fn start(&mut self, now: NaiveDateTime) {
        self.engine.tick(now);
    }

    /// Elle yenileme (ekranı aşağı çekme)
    pub fn refresh(&mut self, now: NaiveDateTime) {
        self.engine.tick(now);
    }

    /// Zamanlayıcı tetiği
    pub fn poll(&mut self, now: NaiveDateTime) {
        self.engine.maybe_tick(now);
    }

    /// Bildirim ayarlarını güncelle ve kalıcılaştır
    pub fn update_settings(&mut self, settings: NotificationSettings) -> AppResult<()> {
        let student_id = self.student.id.unwrap_or_default();
        self.db.settings().save(student_id, &settings)?;
        self.engine.set_settings(settings);
        Ok(())
    }

    /// Oturumu kapat; bildirim durumu temizlenir ve oturum tüketilir
    pub fn logout(mut self) {
        self.engine.clear();
    }
}
