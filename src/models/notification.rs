use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Bildirim kategorisi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Event,
    Reminder,
    Cafeteria,
    Announcement,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Event => "Etkinlik",
            Self::Reminder => "Ders hatırlatması",
            Self::Cafeteria => "Yemekhane",
            Self::Announcement => "Duyuru",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Reminder => write!(f, "reminder"),
            Self::Cafeteria => write!(f, "cafeteria"),
            Self::Announcement => write!(f, "announcement"),
        }
    }
}

/// Oturum içi bildirim. Hiçbir zaman veritabanına yazılmaz; çıkışta
/// ya da açık temizlemeyle yok olur.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
}

/// Kategori başına bildirim açma/kapama anahtarları
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub class_reminders: bool,
    pub event_alerts: bool,
    pub cafeteria_alerts: bool,
    pub announcement_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            class_reminders: true,
            event_alerts: true,
            cafeteria_alerts: true,
            announcement_alerts: true,
        }
    }
}
