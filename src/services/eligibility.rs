//! Kayıt uygunluğu değerlendirmesi
//!
//! Bir (öğrenci, ders) çifti için kayda izin verilip verilmediğine karar
//! verir. Anlık veritabanı görüntüsü üzerinde saf bir fonksiyondur, hiçbir
//! yazma yapmaz. Değerlendirme ile kayıt yazması arasında kilit yoktur;
//! tek kullanıcılı yerel depoda bu aralık kabul edilmiş bir durumdur.

use crate::models::CourseSchedule;
use crate::utils::date::intervals_overlap;

/// Uygun olmama nedeni; kullanıcıya gösterilen metni taşır
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    AlreadyEnrolled,
    QuotaFull,
    ScheduleConflict,
}

impl IneligibleReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AlreadyEnrolled => "Bu derse zaten kayıtlısınız",
            Self::QuotaFull => "Kontenjan dolu",
            Self::ScheduleConflict => "Ders programı çakışıyor",
        }
    }
}

/// Değerlendirme sonucu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub is_eligible: bool,
    pub reason: Option<IneligibleReason>,
}

impl Eligibility {
    pub fn eligible() -> Self {
        Self {
            is_eligible: true,
            reason: None,
        }
    }

    pub fn ineligible(reason: IneligibleReason) -> Self {
        Self {
            is_eligible: false,
            reason: Some(reason),
        }
    }

    pub fn reason_text(&self) -> Option<String> {
        self.reason.map(|r| r.message().to_string())
    }
}

/// Kayıt uygunluğunu değerlendir. Sıra sabittir: önce mevcut kayıt,
/// sonra kontenjan, sonra program çakışması.
pub fn check_eligibility(
    quota: i32,
    enrolled_count: i64,
    already_enrolled: bool,
    candidate_schedules: &[CourseSchedule],
    enrolled_schedules: &[CourseSchedule],
) -> Eligibility {
    if already_enrolled {
        return Eligibility::ineligible(IneligibleReason::AlreadyEnrolled);
    }

    if enrolled_count >= quota as i64 {
        return Eligibility::ineligible(IneligibleReason::QuotaFull);
    }

    for candidate in candidate_schedules {
        for existing in enrolled_schedules {
            if candidate.day == existing.day
                && intervals_overlap(
                    candidate.start_time,
                    candidate.end_time,
                    existing.start_time,
                    existing.end_time,
                )
            {
                return Eligibility::ineligible(IneligibleReason::ScheduleConflict);
            }
        }
    }

    Eligibility::eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::{TimeOfDay, Weekday};

    fn schedule(day: Weekday, start: &str, end: &str) -> CourseSchedule {
        CourseSchedule {
            id: None,
            course_id: 0,
            day,
            start_time: TimeOfDay::parse(start).unwrap(),
            end_time: TimeOfDay::parse(end).unwrap(),
            classroom: String::new(),
            faculty: String::new(),
        }
    }

    #[test]
    fn test_already_enrolled_wins() {
        let result = check_eligibility(10, 10, true, &[], &[]);
        assert!(!result.is_eligible);
        assert_eq!(result.reason, Some(IneligibleReason::AlreadyEnrolled));
    }

    #[test]
    fn test_quota_full() {
        let result = check_eligibility(1, 1, false, &[], &[]);
        assert!(!result.is_eligible);
        assert_eq!(result.reason, Some(IneligibleReason::QuotaFull));

        let result = check_eligibility(2, 1, false, &[], &[]);
        assert!(result.is_eligible);
    }

    #[test]
    fn test_schedule_conflict_same_day() {
        let enrolled = [schedule(Weekday::Pazartesi, "09:00", "11:00")];
        let overlapping = [schedule(Weekday::Pazartesi, "10:00", "12:00")];

        let result = check_eligibility(10, 0, false, &overlapping, &enrolled);
        assert_eq!(result.reason, Some(IneligibleReason::ScheduleConflict));
    }

    #[test]
    fn test_touching_boundary_is_not_conflict() {
        let enrolled = [schedule(Weekday::Pazartesi, "09:00", "11:00")];
        let touching = [schedule(Weekday::Pazartesi, "11:00", "13:00")];

        let result = check_eligibility(10, 0, false, &touching, &enrolled);
        assert!(result.is_eligible);
    }

    #[test]
    fn test_same_time_different_day_is_not_conflict() {
        let enrolled = [schedule(Weekday::Pazartesi, "09:00", "11:00")];
        let other_day = [schedule(Weekday::Sali, "09:00", "11:00")];

        let result = check_eligibility(10, 0, false, &other_day, &enrolled);
        assert!(result.is_eligible);
    }

    #[test]
    fn test_no_schedules_is_eligible() {
        let result = check_eligibility(10, 0, false, &[], &[]);
        assert!(result.is_eligible);
        assert_eq!(result.reason_text(), None);
    }
}
