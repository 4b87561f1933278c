use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::course::{Course, ScheduleEntry};
use crate::utils::date::Weekday;

/// Kayıt durumu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Enrolled,
    Dropped,
}

impl EnrollmentStatus {
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "dropped" => Self::Dropped,
            _ => Self::Enrolled,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enrolled => write!(f, "enrolled"),
            Self::Dropped => write!(f, "dropped"),
        }
    }
}

/// Öğrenci-ders kaydı. Aynı (öğrenci, ders, dönem, akademik yıl)
/// dörtlüsü için ikinci kayıt reddedilir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Option<i64>,
    pub student_id: i64,
    pub course_id: i64,
    pub semester: i32,
    /// Örn. "2025-2026"
    pub academic_year: String,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn new(student_id: i64, course_id: i64, semester: i32, academic_year: impl Into<String>) -> Self {
        Self {
            id: None,
            student_id,
            course_id,
            semester,
            academic_year: academic_year.into(),
            status: EnrollmentStatus::Enrolled,
        }
    }
}

/// Kayıt bilgisiyle birlikte ders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// Kayıt ekranı için uygunluk bilgisiyle işaretlenmiş ders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableCourse {
    pub course: Course,
    pub is_eligible: bool,
    pub eligibility_reason: Option<String>,
}

/// Gün → başlangıç saatine göre sıralı program satırları.
/// BTreeMap anahtar sırası hafta sırasıdır (Pazartesi önce).
pub type WeeklySchedule = BTreeMap<Weekday, Vec<ScheduleEntry>>;
