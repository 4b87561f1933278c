use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Akademik takvim kayıt türü
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarEntryType {
    Semester,
    Exam,
    CourseExam,
    Holiday,
    Deadline,
    Registration,
}

impl CalendarEntryType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Semester => "Dönem",
            Self::Exam => "Sınav haftası",
            Self::CourseExam => "Ders sınavı",
            Self::Holiday => "Tatil",
            Self::Deadline => "Son tarih",
            Self::Registration => "Kayıt",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "exam" => Self::Exam,
            "course_exam" => Self::CourseExam,
            "holiday" => Self::Holiday,
            "deadline" => Self::Deadline,
            "registration" => Self::Registration,
            _ => Self::Semester,
        }
    }
}

impl fmt::Display for CalendarEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semester => write!(f, "semester"),
            Self::Exam => write!(f, "exam"),
            Self::CourseExam => write!(f, "course_exam"),
            Self::Holiday => write!(f, "holiday"),
            Self::Deadline => write!(f, "deadline"),
            Self::Registration => write!(f, "registration"),
        }
    }
}

/// Akademik takvim kaydı (dönem başlangıcı, sınav haftası, tatil...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub entry_type: CalendarEntryType,
    pub icon: String,
    /// Ders sınavı kayıtlarında ilgili ders kodu
    pub course_code: Option<String>,
}
