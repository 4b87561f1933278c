use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Haftanın günü, veritabanında Türkçe gün adıyla saklanır
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Pazartesi,
    Sali,
    Carsamba,
    Persembe,
    Cuma,
    Cumartesi,
    Pazar,
}

impl Weekday {
    pub const ALL: &'static [Self] = &[
        Self::Pazartesi,
        Self::Sali,
        Self::Carsamba,
        Self::Persembe,
        Self::Cuma,
        Self::Cumartesi,
        Self::Pazar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pazartesi => "Pazartesi",
            Self::Sali => "Salı",
            Self::Carsamba => "Çarşamba",
            Self::Persembe => "Perşembe",
            Self::Cuma => "Cuma",
            Self::Cumartesi => "Cumartesi",
            Self::Pazar => "Pazar",
        }
    }

    /// Tam eşleşme; eski kayıtlardaki bilinmeyen gün adları None döner
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Pazartesi" => Some(Self::Pazartesi),
            "Salı" => Some(Self::Sali),
            "Çarşamba" => Some(Self::Carsamba),
            "Perşembe" => Some(Self::Persembe),
            "Cuma" => Some(Self::Cuma),
            "Cumartesi" => Some(Self::Cumartesi),
            "Pazar" => Some(Self::Pazar),
            _ => None,
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Pazartesi,
            chrono::Weekday::Tue => Self::Sali,
            chrono::Weekday::Wed => Self::Carsamba,
            chrono::Weekday::Thu => Self::Persembe,
            chrono::Weekday::Fri => Self::Cuma,
            chrono::Weekday::Sat => Self::Cumartesi,
            chrono::Weekday::Sun => Self::Pazar,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gün içi saat, gece yarısından itibaren dakika olarak tutulur.
/// Veritabanında "HH:MM" metni olarak saklanır.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// "HH:MM" biçiminden ayrıştır
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        let hour: u16 = h.parse().ok()?;
        let minute: u16 = m.parse().ok()?;
        Self::new(hour, minute)
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn from_chrono(t: NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            minutes: (t.hour() * 60 + t.minute()) as u16,
        }
    }

    /// Bu saatten hedefe kalan işaretli dakika (hedef geçmişse negatif)
    pub fn minutes_until(&self, target: TimeOfDay) -> i32 {
        target.minutes as i32 - self.minutes as i32
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// İki zaman aralığı çakışıyor mu? Sınıra değen aralıklar çakışmaz:
/// 09:00-11:00 ile 11:00-13:00 aynı güne sığar.
pub fn intervals_overlap(
    start_a: TimeOfDay,
    end_a: TimeOfDay,
    start_b: TimeOfDay,
    end_b: TimeOfDay,
) -> bool {
    start_a < end_b && start_b < end_a
}

/// Parse bir tarih ("YYYY-MM-DD" öncelikli, esnek biçim)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

/// Parse bir tarih-saat ("YYYY-MM-DDTHH:MM:SS"; boşluklu ve saniyesiz
/// varyantlar da kabul edilir)
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // Yalnızca tarih verilmişse gün başlangıcı say
    parse_date(s).map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// Formatla bir tarihi veritabanı biçimine
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formatla bir tarih-saati veritabanı biçimine
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
