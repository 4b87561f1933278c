use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::{TimeOfDay, Weekday};
use crate::utils::error::{AppError, AppResult};

/// Ders tanımı. Kontenjan ve çakışma denetimleri uygulama katmanında
/// yapılır; veritabanı bu kuralları zorlamaz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub department_id: i64,
    /// Dersin verildiği sınıf (1-4)
    pub class_year: i32,
    /// Dönem (1 = güz, 2 = bahar)
    pub semester: i32,
    pub credits: i32,
    pub ects: i32,
    pub is_mandatory: bool,
    pub instructor: String,
    /// Azami aktif kayıt sayısı
    pub quota: i32,
}

impl Course {
    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("Ders kodu boş olamaz"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Ders adı boş olamaz"));
        }
        if !(1..=4).contains(&self.class_year) {
            return Err(AppError::validation("Sınıf 1 ile 4 arasında olmalı"));
        }
        if self.credits < 0 || self.ects < 0 {
            return Err(AppError::validation("Kredi negatif olamaz"));
        }
        if self.quota < 0 {
            return Err(AppError::validation("Kontenjan negatif olamaz"));
        }
        Ok(())
    }
}

/// Haftalık ders saati satırı
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSchedule {
    pub id: Option<i64>,
    pub course_id: i64,
    pub day: Weekday,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub classroom: String,
    pub faculty: String,
}

impl CourseSchedule {
    pub fn validate(&self) -> AppResult<()> {
        if self.end_time <= self.start_time {
            return Err(AppError::validation("Bitiş saati başlangıçtan sonra olmalı"));
        }
        Ok(())
    }
}

/// Sınav türü
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamType {
    Midterm,
    Final,
    Makeup,
}

impl ExamType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Midterm => "Vize",
            Self::Final => "Final",
            Self::Makeup => "Bütünleme",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "final" => Self::Final,
            "makeup" => Self::Makeup,
            _ => Self::Midterm,
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Midterm => write!(f, "midterm"),
            Self::Final => write!(f, "final"),
            Self::Makeup => write!(f, "makeup"),
        }
    }
}

/// Sınav kaydı
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: Option<i64>,
    pub course_id: i64,
    pub exam_type: ExamType,
    pub exam_date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub classroom: String,
    pub faculty: String,
}

/// Ders bilgisiyle zenginleştirilmiş program satırı; haftalık program ve
/// tüm-program listelerinde kullanılır
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub instructor: String,
    pub day: Weekday,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub classroom: String,
}
