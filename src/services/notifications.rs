//! Türetilmiş bildirim motoru
//!
//! Zamanlayıcı ya da elle tetiklenen her turda yerel tabloları yeniden
//! okur ve ilgi çekici durum değişikliklerinden oturum içi bildirimler
//! üretir. Bildirimler kalıcı değildir; çıkışta temizlenir ve oturum
//! boyunca sınırsız büyür (bilinçli kapsam kararı).

use chrono::{Datelike, Duration, NaiveDateTime};
use tracing::warn;

use crate::db::Database;
use crate::models::{MenuCategory, Notification, NotificationKind, NotificationSettings};
use crate::utils::date::{TimeOfDay, Weekday};
use crate::utils::error::AppResult;

/// Zamanlayıcı aralığı
pub const TICK_INTERVAL_MINUTES: i64 = 5;

/// "Birazdan başlıyor" penceresi
const SOON_WINDOW_MINUTES: i32 = 30;
/// "Başlamak üzere" penceresi
const IMMINENT_WINDOW_MINUTES: i32 = 5;
/// Duyuru tazelik penceresi
const ANNOUNCEMENT_WINDOW_HOURS: i64 = 24;
/// Taranan son duyuru sayısı
const RECENT_ANNOUNCEMENT_LIMIT: i64 = 5;

#[derive(Debug)]
pub struct NotificationEngine {
    db: Database,
    student_id: i64,
    settings: NotificationSettings,
    notifications: Vec<Notification>,
    /// Tarama sürerken gelen tetikler yutulur
    checking: bool,
    last_tick: Option<NaiveDateTime>,
    next_id: u64,
}

impl NotificationEngine {
    pub fn new(db: Database, student_id: i64, settings: NotificationSettings) -> Self {
        Self {
            db,
            student_id,
            settings,
            notifications: Vec::new(),
            checking: false,
            last_tick: None,
            next_id: 0,
        }
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: NotificationSettings) {
        self.settings = settings;
    }

    /// En yeniden eskiye bildirimler
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: u64) {
        if let Some(n) = self.notifications.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    /// Tüm bildirim durumunu at (çıkışta çağrılır)
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.last_tick = None;
    }

    /// Zamanlayıcı tetiği: son taramadan bu yana aralık dolmadıysa hiçbir
    /// şey yapmaz
    pub fn maybe_tick(&mut self, now: NaiveDateTime) {
        let due = match self.last_tick {
            None => true,
            Some(last) => now.signed_duration_since(last) >= Duration::minutes(TICK_INTERVAL_MINUTES),
        };

        if due {
            self.tick(now);
        }
    }

    /// Bir tarama turu. Kategoriler bağımsızdır: biri hata verirse
    /// loglanır, diğerleri yine de çalışır.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if self.checking {
            return;
        }
        self.checking = true;

        if self.settings.class_reminders {
            if let Err(e) = self.check_class_reminders(now) {
                warn!("Ders hatırlatması taraması başarısız: {}", e);
            }
        }
        if self.settings.event_alerts {
            if let Err(e) = self.check_events(now) {
                warn!("Etkinlik taraması başarısız: {}", e);
            }
        }
        if self.settings.cafeteria_alerts {
            if let Err(e) = self.check_cafeteria(now) {
                warn!("Yemekhane taraması başarısız: {}", e);
            }
        }
        if self.settings.announcement_alerts {
            if let Err(e) = self.check_announcements(now) {
                warn!("Duyuru taraması başarısız: {}", e);
            }
        }

        self.last_tick = Some(now);
        self.checking = false;
    }

    /// Bugünkü derslerden başlamasına 30 dakika kalanlar için bir, 5
    /// dakika kalanlar için ek bir hatırlatma
    fn check_class_reminders(&mut self, now: NaiveDateTime) -> AppResult<()> {
        let today = Weekday::from_chrono(now.date().weekday());
        let schedule = self.db.enrollments().weekly_schedule(self.student_id)?;

        let Some(entries) = schedule.get(&today) else {
            return Ok(());
        };

        let now_time = TimeOfDay::from_chrono(now.time());
        for entry in entries.clone() {
            let minutes = now_time.minutes_until(entry.start_time);

            if minutes > 0 && minutes <= SOON_WINDOW_MINUTES {
                self.push(
                    NotificationKind::Reminder,
                    "Dersin birazdan başlıyor".into(),
                    format!(
                        "{} {} dakika sonra başlıyor ({})",
                        entry.course_name, minutes, entry.classroom
                    ),
                    now,
                );
            }

            if minutes > 0 && minutes <= IMMINENT_WINDOW_MINUTES {
                self.push(
                    NotificationKind::Reminder,
                    "Dersin başlamak üzere!".into(),
                    format!("{} şimdi başlıyor, derslik {}", entry.course_name, entry.classroom),
                    now,
                );
            }
        }

        Ok(())
    }

    /// Etkinlikler bugün/yarın, akademik takvim kayıtları ayrıca 3 gün
    /// kala duyurulur
    fn check_events(&mut self, now: NaiveDateTime) -> AppResult<()> {
        let today = now.date();

        for event in self.db.events().upcoming(today)? {
            let message = format!(
                "{} - {} ({})",
                event.event_date.format("%H:%M"),
                event.location,
                event.organizer
            );
            match (event.event_date.date() - today).num_days() {
                0 => self.push(
                    NotificationKind::Event,
                    format!("Bugün: {}", event.title),
                    message,
                    now,
                ),
                1 => self.push(
                    NotificationKind::Event,
                    format!("Yarın: {}", event.title),
                    message,
                    now,
                ),
                _ => {}
            }
        }

        for entry in self.db.calendar().upcoming(today)? {
            let message = if entry.description.is_empty() {
                entry.entry_type.label().to_string()
            } else {
                entry.description.clone()
            };
            match (entry.event_date - today).num_days() {
                0 => self.push(
                    NotificationKind::Event,
                    format!("Bugün: {}", entry.title),
                    message,
                    now,
                ),
                1 => self.push(
                    NotificationKind::Event,
                    format!("Yarın: {}", entry.title),
                    message,
                    now,
                ),
                3 => self.push(
                    NotificationKind::Event,
                    format!("3 gün sonra: {}", entry.title),
                    message,
                    now,
                ),
                _ => {}
            }
        }

        Ok(())
    }

    /// Günün menüsünde ana yemek varsa ilk iki yemeği anan tek bildirim
    fn check_cafeteria(&mut self, now: NaiveDateTime) -> AppResult<()> {
        let menu = self.db.cafeteria().menu_by_date(now.date())?;

        let mains: Vec<String> = menu
            .iter()
            .filter(|i| i.category == MenuCategory::Main && i.available)
            .take(2)
            .map(|i| i.name.clone())
            .collect();

        if mains.is_empty() {
            return Ok(());
        }

        self.push(
            NotificationKind::Cafeteria,
            "Bugünün menüsü hazır".into(),
            format!("Ana yemek: {}", mains.join(", ")),
            now,
        );

        Ok(())
    }

    /// Son 24 saat içinde açılan duyurular (en yeni 5 tanesi taranır)
    fn check_announcements(&mut self, now: NaiveDateTime) -> AppResult<()> {
        for announcement in self.db.announcements().recent(RECENT_ANNOUNCEMENT_LIMIT)? {
            let Some(created) = announcement.created_at else {
                continue;
            };

            if now.signed_duration_since(created) <= Duration::hours(ANNOUNCEMENT_WINDOW_HOURS) {
                self.push(
                    NotificationKind::Announcement,
                    "Yeni duyuru".into(),
                    format!("{}: {}", announcement.owner, announcement.title),
                    now,
                );
            }
        }

        Ok(())
    }

    /// Aynı (başlık, mesaj) çifti varsa ekleme; tek tekrar anahtarı
    /// budur, dakika sayısı değişen metinler ayrı bildirim sayılır.
    fn push(&mut self, kind: NotificationKind, title: String, message: String, now: NaiveDateTime) {
        let duplicate = self
            .notifications
            .iter()
            .any(|n| n.title == title && n.message == message);
        if duplicate {
            return;
        }

        self.next_id += 1;
        self.notifications.insert(
            0,
            Notification {
                id: self.next_id,
                kind,
                title,
                message,
                timestamp: now,
                read: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{
        Announcement, CampusEvent, Course, CourseSchedule, Department, Enrollment, MenuItem,
        Student,
    };
    use crate::utils::date::parse_datetime;
    use chrono::NaiveDate;

    // 2025-09-15 bir Pazartesi
    const MONDAY: &str = "2025-09-15";

    struct Fixture {
        db: Database,
        student_id: i64,
        dept_id: i64,
    }

    impl Fixture {
        fn new() -> Self {
            let db = Database::open_in_memory().unwrap();
            let mut dept = Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
            let dept_id = db.departments().create(&mut dept).unwrap();
            let mut student = Student::new("2025001", "Ayşe", "Yılmaz", "sifre", dept_id, 1);
            let student_id = db.students().create(&mut student).unwrap();
            Self { db, student_id, dept_id }
        }

        fn engine(&self) -> NotificationEngine {
            NotificationEngine::new(
                self.db.clone(),
                self.student_id,
                NotificationSettings::default(),
            )
        }

        fn enrolled_course_at(&self, code: &str, day: Weekday, start: &str, end: &str) {
            let mut course = Course {
                id: None,
                code: code.into(),
                name: format!("{} Dersi", code),
                department_id: self.dept_id,
                class_year: 1,
                semester: 1,
                credits: 3,
                ects: 5,
                is_mandatory: true,
                instructor: "Dr. Demir".into(),
                quota: 40,
            };
            let course_id = self.db.courses().create(&mut course).unwrap();

            let mut schedule = CourseSchedule {
                id: None,
                course_id,
                day,
                start_time: TimeOfDay::parse(start).unwrap(),
                end_time: TimeOfDay::parse(end).unwrap(),
                classroom: "D101".into(),
                faculty: "Mühendislik".into(),
            };
            self.db.courses().create_schedule(&mut schedule).unwrap();

            self.db
                .enrollments()
                .enroll(&Enrollment::new(self.student_id, course_id, 1, "2025-2026"))
                .unwrap();
        }
    }

    fn at(datetime: &str) -> NaiveDateTime {
        parse_datetime(datetime).unwrap()
    }

    #[test]
    fn test_event_today_notification_and_dedup() {
        let f = Fixture::new();
        let mut event = CampusEvent {
            id: None,
            title: "Bahar Konseri".into(),
            description: String::new(),
            location: "Amfi".into(),
            event_date: at("2025-09-15T20:00:00"),
            organizer: "Müzik Kulübü".into(),
        };
        f.db.events().create(&mut event).unwrap();

        let mut engine = f.engine();
        let now = at("2025-09-15T09:00:00");

        engine.tick(now);
        let today: Vec<_> = engine
            .notifications()
            .iter()
            .filter(|n| n.title.contains("Bugün"))
            .collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].title, "Bugün: Bahar Konseri");

        // Veri değişmeden ikinci tarama yeni bildirim üretmez (P5)
        let count = engine.notifications().len();
        engine.tick(now);
        assert_eq!(engine.notifications().len(), count);
    }

    #[test]
    fn test_event_tomorrow_and_calendar_three_days() {
        let f = Fixture::new();

        let mut event = CampusEvent {
            id: None,
            title: "Kariyer Günü".into(),
            description: String::new(),
            location: "Konferans Salonu".into(),
            event_date: at("2025-09-16T10:00:00"),
            organizer: "Kariyer Merkezi".into(),
        };
        f.db.events().create(&mut event).unwrap();

        let mut entry = crate::models::CalendarEntry {
            id: None,
            title: "Ders ekleme son günü".into(),
            description: String::new(),
            event_date: NaiveDate::from_ymd_opt(2025, 9, 18).unwrap(),
            end_date: None,
            entry_type: crate::models::CalendarEntryType::Deadline,
            icon: "clock".into(),
            course_code: None,
        };
        f.db.calendar().create(&mut entry).unwrap();

        let mut engine = f.engine();
        engine.tick(at("2025-09-15T09:00:00"));

        let titles: Vec<_> = engine.notifications().iter().map(|n| n.title.as_str()).collect();
        assert!(titles.contains(&"Yarın: Kariyer Günü"));
        assert!(titles.contains(&"3 gün sonra: Ders ekleme son günü"));
    }

    #[test]
    fn test_class_reminder_windows() {
        let f = Fixture::new();
        f.enrolled_course_at("BM101", Weekday::Pazartesi, "09:00", "11:00");

        // 20 dakika kala: yalnızca "birazdan"
        let mut engine = f.engine();
        engine.tick(at(&format!("{}T08:40:00", MONDAY)));
        assert_eq!(engine.notifications().len(), 1);
        assert_eq!(engine.notifications()[0].title, "Dersin birazdan başlıyor");
        assert!(engine.notifications()[0].message.contains("20 dakika"));

        // 4 dakika kala: iki pencere de tetiklenir
        let mut engine = f.engine();
        engine.tick(at(&format!("{}T08:56:00", MONDAY)));
        let titles: Vec<_> = engine.notifications().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Dersin birazdan başlıyor"));
        assert!(titles.contains(&"Dersin başlamak üzere!"));

        // Ders başladıktan sonra hatırlatma yok
        let mut engine = f.engine();
        engine.tick(at(&format!("{}T09:00:00", MONDAY)));
        assert!(engine.notifications().is_empty());
    }

    #[test]
    fn test_countdown_rewordings_are_not_deduplicated() {
        let f = Fixture::new();
        f.enrolled_course_at("BM101", Weekday::Pazartesi, "09:00", "11:00");

        let mut engine = f.engine();
        engine.tick(at(&format!("{}T08:35:00", MONDAY))); // 25 dakika
        engine.tick(at(&format!("{}T08:45:00", MONDAY))); // 15 dakika

        let reminders: Vec<_> = engine
            .notifications()
            .iter()
            .filter(|n| n.kind == NotificationKind::Reminder)
            .collect();
        assert_eq!(reminders.len(), 2);
        assert!(reminders.iter().any(|n| n.message.contains("25 dakika")));
        assert!(reminders.iter().any(|n| n.message.contains("15 dakika")));
    }

    #[test]
    fn test_cafeteria_names_up_to_two_mains() {
        let f = Fixture::new();
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();

        for name in ["Karnıyarık", "İskender", "Mantı"] {
            let mut item = MenuItem {
                id: None,
                name: name.into(),
                description: String::new(),
                price: 45.0,
                category: MenuCategory::Main,
                available: true,
                menu_date: date,
            };
            f.db.cafeteria().create_menu_item(&mut item).unwrap();
        }

        let mut engine = f.engine();
        engine.tick(at("2025-09-15T11:00:00"));

        let cafeteria: Vec<_> = engine
            .notifications()
            .iter()
            .filter(|n| n.kind == NotificationKind::Cafeteria)
            .collect();
        assert_eq!(cafeteria.len(), 1);
        assert_eq!(cafeteria[0].message, "Ana yemek: Karnıyarık, Mantı");
    }

    #[test]
    fn test_announcement_freshness_window() {
        let f = Fixture::new();

        let mut fresh = Announcement::new("Rektörlük", "Yeni yemekhane saatleri", "");
        f.db.announcements().create(&mut fresh).unwrap();

        let mut stale = Announcement::new("Rektörlük", "Eski duyuru", "");
        let stale_id = f.db.announcements().create(&mut stale).unwrap();
        f.db.with_connection(|conn| {
            conn.execute(
                "UPDATE announcements SET created_at = '2025-01-01 08:00:00' WHERE id = ?",
                [stale_id],
            )?;
            Ok(())
        })
        .unwrap();

        let mut engine = f.engine();
        engine.tick(chrono::Utc::now().naive_utc());

        let announcements: Vec<_> = engine
            .notifications()
            .iter()
            .filter(|n| n.kind == NotificationKind::Announcement)
            .collect();
        assert_eq!(announcements.len(), 1);
        assert!(announcements[0].message.contains("Yeni yemekhane saatleri"));
    }

    #[test]
    fn test_settings_gate_categories() {
        let f = Fixture::new();
        let mut event = CampusEvent {
            id: None,
            title: "Bahar Konseri".into(),
            description: String::new(),
            location: "Amfi".into(),
            event_date: at("2025-09-15T20:00:00"),
            organizer: "Müzik Kulübü".into(),
        };
        f.db.events().create(&mut event).unwrap();

        let mut engine = NotificationEngine::new(
            f.db.clone(),
            f.student_id,
            NotificationSettings {
                class_reminders: false,
                event_alerts: false,
                cafeteria_alerts: false,
                announcement_alerts: false,
            },
        );
        engine.tick(at("2025-09-15T09:00:00"));
        assert!(engine.notifications().is_empty());
    }

    #[test]
    fn test_maybe_tick_respects_interval() {
        let f = Fixture::new();
        let mut engine = f.engine();

        engine.maybe_tick(at("2025-09-15T09:00:00"));

        // Aradan 2 dakika geçti: yeni duyuru henüz taranmaz
        let mut a = Announcement::new("Kulüp", "Turnuva", "");
        f.db.announcements().create(&mut a).unwrap();
        engine.maybe_tick(at("2025-09-15T09:02:00"));
        assert!(engine.notifications().is_empty());

        // Aralık dolunca taranır
        engine.maybe_tick(at("2025-09-15T09:05:00"));
        assert_eq!(engine.notifications().len(), 1);
    }

    #[test]
    fn test_read_tracking_and_clear() {
        let f = Fixture::new();
        let mut a = Announcement::new("Kulüp", "Turnuva", "");
        f.db.announcements().create(&mut a).unwrap();

        let mut engine = f.engine();
        engine.tick(chrono::Utc::now().naive_utc());
        assert_eq!(engine.unread_count(), 1);

        let id = engine.notifications()[0].id;
        engine.mark_read(id);
        assert_eq!(engine.unread_count(), 0);

        engine.clear();
        assert!(engine.notifications().is_empty());
    }
}
