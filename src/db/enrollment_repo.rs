use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::course_repo::CourseRepository;
use crate::models::{AvailableCourse, CourseSchedule, EnrolledCourse, Enrollment, EnrollmentStatus, WeeklySchedule};
use crate::services::eligibility::check_eligibility;
use crate::utils::error::{AppError, AppResult};

pub struct EnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EnrollmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Derse kaydol. Aynı (öğrenci, ders, dönem, yıl) için ikinci çağrı
    /// reddedilir; UNIQUE kısıtı da aynı kuralı tabanda destekler.
    pub fn enroll(&self, enrollment: &Enrollment) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        Self::insert_enrollment(&conn, enrollment)
    }

    /// Birden çok derse tek seferde kaydol; ya hepsi ya hiçbiri.
    pub fn enroll_many(&self, enrollments: &[Enrollment]) -> AppResult<Vec<i64>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            ids.push(Self::insert_enrollment(&tx, enrollment)?);
        }

        tx.commit()?;
        Ok(ids)
    }

    fn insert_enrollment(conn: &Connection, enrollment: &Enrollment) -> AppResult<i64> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM student_courses
                           WHERE student_id = ?1 AND course_id = ?2
                             AND semester = ?3 AND academic_year = ?4)",
            params![
                enrollment.student_id,
                enrollment.course_id,
                enrollment.semester,
                enrollment.academic_year,
            ],
            |row| row.get(0),
        )?;

        if exists {
            return Err(AppError::already_exists("Bu derse bu dönem zaten kayıtlısınız"));
        }

        conn.execute(
            "INSERT INTO student_courses (student_id, course_id, semester, academic_year, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                enrollment.student_id,
                enrollment.course_id,
                enrollment.semester,
                enrollment.academic_year,
                enrollment.status.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Ders kaydını sil
    pub fn unenroll(&self, student_id: i64, course_id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM student_courses WHERE student_id = ?1 AND course_id = ?2",
            params![student_id, course_id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Öğrenci {} için ders {} kaydı",
                student_id, course_id
            )));
        }

        Ok(())
    }

    /// Öğrencinin derse aktif kaydı var mı?
    pub fn is_enrolled(&self, student_id: i64, course_id: i64) -> AppResult<bool> {
        let conn = self.conn.lock().unwrap();
        let enrolled: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM student_courses
                           WHERE student_id = ?1 AND course_id = ?2 AND status = 'enrolled')",
            params![student_id, course_id],
            |row| row.get(0),
        )?;
        Ok(enrolled)
    }

    /// Öğrencinin aktif kayıtlı dersleri, ders bilgisiyle
    pub fn enrolled_courses(&self, student_id: i64) -> AppResult<Vec<EnrolledCourse>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT sc.id, sc.student_id, sc.course_id, sc.semester, sc.academic_year, sc.status,
                    c.id, c.code, c.name, c.department_id, c.class_year, c.semester,
                    c.credits, c.ects, c.is_mandatory, c.instructor, c.quota
             FROM student_courses sc
             INNER JOIN courses c ON c.id = sc.course_id
             WHERE sc.student_id = ? AND sc.status = 'enrolled'
             ORDER BY c.code",
        )?;

        let rows = stmt
            .query_map([student_id], |row| {
                let enrollment = Enrollment {
                    id: row.get(0).ok(),
                    student_id: row.get(1).unwrap_or_default(),
                    course_id: row.get(2).unwrap_or_default(),
                    semester: row.get(3).unwrap_or(1),
                    academic_year: row.get(4).unwrap_or_default(),
                    status: EnrollmentStatus::from_db_str(
                        &row.get::<_, String>(5).unwrap_or_default(),
                    ),
                };

                let course = crate::models::Course {
                    id: row.get(6).ok(),
                    code: row.get(7).unwrap_or_default(),
                    name: row.get(8).unwrap_or_default(),
                    department_id: row.get(9).unwrap_or_default(),
                    class_year: row.get(10).unwrap_or(1),
                    semester: row.get(11).unwrap_or(1),
                    credits: row.get(12).unwrap_or_default(),
                    ects: row.get(13).unwrap_or_default(),
                    is_mandatory: row.get::<_, i32>(14).unwrap_or(0) != 0,
                    instructor: row.get(15).unwrap_or_default(),
                    quota: row.get(16).unwrap_or_default(),
                };

                Ok(EnrolledCourse { enrollment, course })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Haftalık ders programı: gün → başlangıç saatine göre sıralı satırlar
    pub fn weekly_schedule(&self, student_id: i64) -> AppResult<WeeklySchedule> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.code, c.name, c.instructor,
                    s.day_of_week, s.start_time, s.end_time, s.classroom
             FROM course_schedules s
             INNER JOIN courses c ON c.id = s.course_id
             INNER JOIN student_courses sc ON sc.course_id = c.id
             WHERE sc.student_id = ? AND sc.status = 'enrolled'",
        )?;

        let entries: Vec<_> = stmt
            .query_map([student_id], |row| Ok(CourseRepository::row_to_entry(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        let mut schedule = WeeklySchedule::new();
        for entry in entries {
            schedule.entry(entry.day).or_default().push(entry);
        }
        for entries in schedule.values_mut() {
            entries.sort_by_key(|e| e.start_time);
        }

        Ok(schedule)
    }

    /// Öğrencinin bölümündeki, sınıfına açılan dersleri uygunluk
    /// bilgisiyle listele. Uygunluk: mevcut kayıt, kontenjan, çakışma.
    pub fn available_courses(&self, student_id: i64) -> AppResult<Vec<AvailableCourse>> {
        let conn = self.conn.lock().unwrap();

        let (department_id, class_year): (i64, i32) = conn
            .query_row(
                "SELECT department_id, class_year FROM students WHERE id = ?",
                [student_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|_| AppError::not_found(format!("Öğrenci {}", student_id)))?;

        let mut stmt = conn.prepare(
            "SELECT id, code, name, department_id, class_year, semester,
                    credits, ects, is_mandatory, instructor, quota
             FROM courses
             WHERE department_id = ?1 AND class_year = ?2
             ORDER BY code",
        )?;
        let candidates: Vec<_> = stmt
            .query_map(params![department_id, class_year], |row| {
                Ok(CourseRepository::row_to_course(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        let mut stmt = conn.prepare(
            "SELECT course_id FROM student_courses
             WHERE student_id = ? AND status = 'enrolled'",
        )?;
        let enrolled_ids: Vec<i64> = stmt
            .query_map([student_id], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        let enrolled_schedules = Self::schedules_for_enrolled(&conn, student_id)?;

        let mut result = Vec::with_capacity(candidates.len());
        for course in candidates {
            let course_id = course.id.unwrap_or_default();

            let enrolled_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM student_courses WHERE course_id = ? AND status = 'enrolled'",
                [course_id],
                |row| row.get(0),
            )?;

            let candidate_schedules = Self::schedules_for_course(&conn, course_id)?;

            let eligibility = check_eligibility(
                course.quota,
                enrolled_count,
                enrolled_ids.contains(&course_id),
                &candidate_schedules,
                &enrolled_schedules,
            );

            result.push(AvailableCourse {
                course,
                is_eligible: eligibility.is_eligible,
                eligibility_reason: eligibility.reason_text(),
            });
        }

        Ok(result)
    }

    fn schedules_for_course(conn: &Connection, course_id: i64) -> AppResult<Vec<CourseSchedule>> {
        let mut stmt = conn.prepare(
            "SELECT id, course_id, day_of_week, start_time, end_time, classroom, faculty
             FROM course_schedules WHERE course_id = ?",
        )?;
        let schedules = stmt
            .query_map([course_id], |row| Ok(CourseRepository::row_to_schedule(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();
        Ok(schedules)
    }

    fn schedules_for_enrolled(conn: &Connection, student_id: i64) -> AppResult<Vec<CourseSchedule>> {
        let mut stmt = conn.prepare(
            "SELECT s.id, s.course_id, s.day_of_week, s.start_time, s.end_time, s.classroom, s.faculty
             FROM course_schedules s
             INNER JOIN student_courses sc ON sc.course_id = s.course_id
             WHERE sc.student_id = ? AND sc.status = 'enrolled'",
        )?;
        let schedules = stmt
            .query_map([student_id], |row| Ok(CourseRepository::row_to_schedule(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();
        Ok(schedules)
    }
}
