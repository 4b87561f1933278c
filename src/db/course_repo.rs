use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{Course, CourseSchedule, Exam, ExamType, ScheduleEntry};
use crate::utils::date::{self, TimeOfDay, Weekday};
use crate::utils::error::{AppError, AppResult};

pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    const COLUMNS: &'static str = "id, code, name, department_id, class_year, semester,
                    credits, ects, is_mandatory, instructor, quota";

    /// Tüm dersleri getir
    pub fn find_all(&self) -> AppResult<Vec<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses ORDER BY code",
            Self::COLUMNS
        ))?;

        let courses = stmt
            .query_map([], |row| Ok(Self::row_to_course(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(courses)
    }

    /// Dersi ID ile getir
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses WHERE id = ?",
            Self::COLUMNS
        ))?;

        let course = stmt
            .query_row([id], |row| Ok(Self::row_to_course(row)))
            .ok();

        Ok(course)
    }

    /// Bölümün derslerini getir
    pub fn find_by_department(&self, department_id: i64) -> AppResult<Vec<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM courses WHERE department_id = ? ORDER BY class_year, code",
            Self::COLUMNS
        ))?;

        let courses = stmt
            .query_map([department_id], |row| Ok(Self::row_to_course(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(courses)
    }

    /// Yeni ders oluştur
    pub fn create(&self, course: &mut Course) -> AppResult<i64> {
        course.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO courses (code, name, department_id, class_year, semester,
                                  credits, ects, is_mandatory, instructor, quota)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                course.code,
                course.name,
                course.department_id,
                course.class_year,
                course.semester,
                course.credits,
                course.ects,
                course.is_mandatory as i32,
                course.instructor,
                course.quota,
            ],
        )?;

        let id = conn.last_insert_rowid();
        course.id = Some(id);

        Ok(id)
    }

    /// Dersi güncelle
    pub fn update(&self, course: &Course) -> AppResult<()> {
        let id = course
            .id
            .ok_or_else(|| AppError::validation("Dersin ID'si yok"))?;
        course.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE courses SET
                code = ?1, name = ?2, department_id = ?3, class_year = ?4, semester = ?5,
                credits = ?6, ects = ?7, is_mandatory = ?8, instructor = ?9, quota = ?10
             WHERE id = ?11",
            params![
                course.code,
                course.name,
                course.department_id,
                course.class_year,
                course.semester,
                course.credits,
                course.ects,
                course.is_mandatory as i32,
                course.instructor,
                course.quota,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Ders {}", id)));
        }

        Ok(())
    }

    /// Dersi sil (saatler, sınavlar ve kayıtlar CASCADE ile gider)
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM courses WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Ders {}", id)));
        }

        Ok(())
    }

    /// Dersteki aktif kayıt sayısı
    pub fn enrolled_count(&self, course_id: i64) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM student_courses WHERE course_id = ? AND status = 'enrolled'",
            [course_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ------------------------------------------------------------
    // Ders saatleri
    // ------------------------------------------------------------

    /// Dersin haftalık saatlerini getir
    pub fn schedules_for_course(&self, course_id: i64) -> AppResult<Vec<CourseSchedule>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, course_id, day_of_week, start_time, end_time, classroom, faculty
             FROM course_schedules WHERE course_id = ?
             ORDER BY day_of_week, start_time",
        )?;

        let schedules = stmt
            .query_map([course_id], |row| Ok(Self::row_to_schedule(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(schedules)
    }

    /// Tüm program satırlarını ders bilgisiyle getir (yönetim ekranı)
    pub fn all_schedules(&self) -> AppResult<Vec<ScheduleEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.code, c.name, c.instructor,
                    s.day_of_week, s.start_time, s.end_time, s.classroom
             FROM course_schedules s
             INNER JOIN courses c ON c.id = s.course_id
             ORDER BY c.code, s.start_time",
        )?;

        let entries = stmt
            .query_map([], |row| Ok(Self::row_to_entry(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(entries)
    }

    /// Yeni ders saati oluştur
    pub fn create_schedule(&self, schedule: &mut CourseSchedule) -> AppResult<i64> {
        schedule.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO course_schedules (course_id, day_of_week, start_time, end_time, classroom, faculty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                schedule.course_id,
                schedule.day.as_str(),
                schedule.start_time.to_string(),
                schedule.end_time.to_string(),
                schedule.classroom,
                schedule.faculty,
            ],
        )?;

        let id = conn.last_insert_rowid();
        schedule.id = Some(id);

        Ok(id)
    }

    /// Ders saatini sil
    pub fn delete_schedule(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM course_schedules WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Ders saati {}", id)));
        }

        Ok(())
    }

    // ------------------------------------------------------------
    // Sınavlar
    // ------------------------------------------------------------

    /// Dersin sınavlarını getir
    pub fn exams_for_course(&self, course_id: i64) -> AppResult<Vec<Exam>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, course_id, exam_type, exam_date, start_time, end_time, classroom, faculty
             FROM exams WHERE course_id = ?
             ORDER BY exam_date, start_time",
        )?;

        let exams = stmt
            .query_map([course_id], |row| Ok(Self::row_to_exam(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(exams)
    }

    /// Öğrencinin kayıtlı olduğu derslerin sınavlarını getir
    pub fn exams_for_student(&self, student_id: i64) -> AppResult<Vec<Exam>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT e.id, e.course_id, e.exam_type, e.exam_date, e.start_time, e.end_time,
                    e.classroom, e.faculty
             FROM exams e
             INNER JOIN student_courses sc ON sc.course_id = e.course_id
             WHERE sc.student_id = ? AND sc.status = 'enrolled'
             ORDER BY e.exam_date, e.start_time",
        )?;

        let exams = stmt
            .query_map([student_id], |row| Ok(Self::row_to_exam(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(exams)
    }

    /// Tüm sınavları getir (yönetim ekranı)
    pub fn all_exams(&self) -> AppResult<Vec<Exam>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, course_id, exam_type, exam_date, start_time, end_time, classroom, faculty
             FROM exams ORDER BY exam_date, start_time",
        )?;

        let exams = stmt
            .query_map([], |row| Ok(Self::row_to_exam(row)))?
            .filter_map(|r| r.ok().flatten())
            .collect();

        Ok(exams)
    }

    /// Yeni sınav oluştur
    pub fn create_exam(&self, exam: &mut Exam) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO exams (course_id, exam_type, exam_date, start_time, end_time, classroom, faculty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                exam.course_id,
                exam.exam_type.to_string(),
                date::format_date(exam.exam_date),
                exam.start_time.to_string(),
                exam.end_time.to_string(),
                exam.classroom,
                exam.faculty,
            ],
        )?;

        let id = conn.last_insert_rowid();
        exam.id = Some(id);

        Ok(id)
    }

    /// Sınavı güncelle
    pub fn update_exam(&self, exam: &Exam) -> AppResult<()> {
        let id = exam
            .id
            .ok_or_else(|| AppError::validation("Sınavın ID'si yok"))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE exams SET
                course_id = ?1, exam_type = ?2, exam_date = ?3,
                start_time = ?4, end_time = ?5, classroom = ?6, faculty = ?7
             WHERE id = ?8",
            params![
                exam.course_id,
                exam.exam_type.to_string(),
                date::format_date(exam.exam_date),
                exam.start_time.to_string(),
                exam.end_time.to_string(),
                exam.classroom,
                exam.faculty,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Sınav {}", id)));
        }

        Ok(())
    }

    /// Sınavı sil
    pub fn delete_exam(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM exams WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Sınav {}", id)));
        }

        Ok(())
    }

    // ------------------------------------------------------------
    // Satır dönüştürücüler
    // ------------------------------------------------------------

    pub(crate) fn row_to_course(row: &Row) -> Course {
        Course {
            id: row.get(0).ok(),
            code: row.get(1).unwrap_or_default(),
            name: row.get(2).unwrap_or_default(),
            department_id: row.get(3).unwrap_or_default(),
            class_year: row.get(4).unwrap_or(1),
            semester: row.get(5).unwrap_or(1),
            credits: row.get(6).unwrap_or_default(),
            ects: row.get(7).unwrap_or_default(),
            is_mandatory: row.get::<_, i32>(8).unwrap_or(0) != 0,
            instructor: row.get(9).unwrap_or_default(),
            quota: row.get(10).unwrap_or_default(),
        }
    }

    /// Bozuk gün/saat metni taşıyan satırlar atlanır
    pub(crate) fn row_to_schedule(row: &Row) -> Option<CourseSchedule> {
        let day = Weekday::from_db_str(&row.get::<_, String>(2).ok()?)?;
        let start_time = TimeOfDay::parse(&row.get::<_, String>(3).ok()?)?;
        let end_time = TimeOfDay::parse(&row.get::<_, String>(4).ok()?)?;

        Some(CourseSchedule {
            id: row.get(0).ok(),
            course_id: row.get(1).unwrap_or_default(),
            day,
            start_time,
            end_time,
            classroom: row.get(5).unwrap_or_default(),
            faculty: row.get(6).unwrap_or_default(),
        })
    }

    fn row_to_exam(row: &Row) -> Option<Exam> {
        let exam_date =
            NaiveDate::parse_from_str(&row.get::<_, String>(3).ok()?, "%Y-%m-%d").ok()?;
        let start_time = TimeOfDay::parse(&row.get::<_, String>(4).ok()?)?;
        let end_time = TimeOfDay::parse(&row.get::<_, String>(5).ok()?)?;

        Some(Exam {
            id: row.get(0).ok(),
            course_id: row.get(1).unwrap_or_default(),
            exam_type: ExamType::from_db_str(&row.get::<_, String>(2).unwrap_or_default()),
            exam_date,
            start_time,
            end_time,
            classroom: row.get(6).unwrap_or_default(),
            faculty: row.get(7).unwrap_or_default(),
        })
    }

    pub(crate) fn row_to_entry(row: &Row) -> Option<ScheduleEntry> {
        let day = Weekday::from_db_str(&row.get::<_, String>(4).ok()?)?;
        let start_time = TimeOfDay::parse(&row.get::<_, String>(5).ok()?)?;
        let end_time = TimeOfDay::parse(&row.get::<_, String>(6).ok()?)?;

        Some(ScheduleEntry {
            course_id: row.get(0).unwrap_or_default(),
            course_code: row.get(1).unwrap_or_default(),
            course_name: row.get(2).unwrap_or_default(),
            instructor: row.get(3).unwrap_or_default(),
            day,
            start_time,
            end_time,
            classroom: row.get(7).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Department;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let mut dept = Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
        let dept_id = db.departments().create(&mut dept).unwrap();
        (db, dept_id)
    }

    fn course(dept_id: i64, code: &str) -> Course {
        Course {
            id: None,
            code: code.into(),
            name: "Test Dersi".into(),
            department_id: dept_id,
            class_year: 1,
            semester: 1,
            credits: 3,
            ects: 5,
            is_mandatory: true,
            instructor: "Dr. Demir".into(),
            quota: 40,
        }
    }

    #[test]
    fn test_course_crud() {
        let (db, dept_id) = setup();
        let repo = db.courses();

        let mut c = course(dept_id, "BM101");
        let id = repo.create(&mut c).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.code, "BM101");
        assert!(found.is_mandatory);

        c.quota = 10;
        repo.update(&c).unwrap();
        assert_eq!(repo.find_by_id(id).unwrap().unwrap().quota, 10);

        assert_eq!(repo.find_by_department(dept_id).unwrap().len(), 1);

        repo.delete(id).unwrap();
        assert!(repo.find_by_id(id).unwrap().is_none());
    }

    #[test]
    fn test_schedule_rows_cascade_with_course() {
        let (db, dept_id) = setup();
        let repo = db.courses();

        let mut c = course(dept_id, "BM101");
        let course_id = repo.create(&mut c).unwrap();

        let mut schedule = CourseSchedule {
            id: None,
            course_id,
            day: Weekday::Pazartesi,
            start_time: TimeOfDay::parse("09:00").unwrap(),
            end_time: TimeOfDay::parse("11:00").unwrap(),
            classroom: "D101".into(),
            faculty: "Mühendislik".into(),
        };
        repo.create_schedule(&mut schedule).unwrap();

        assert_eq!(repo.schedules_for_course(course_id).unwrap().len(), 1);
        assert_eq!(repo.all_schedules().unwrap().len(), 1);

        repo.delete(course_id).unwrap();
        assert!(repo.schedules_for_course(course_id).unwrap().is_empty());
    }

    #[test]
    fn test_exams_for_student_follows_enrollment() {
        let (db, dept_id) = setup();
        let repo = db.courses();

        let mut c = course(dept_id, "BM101");
        let course_id = repo.create(&mut c).unwrap();

        let mut exam = Exam {
            id: None,
            course_id,
            exam_type: ExamType::Midterm,
            exam_date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
            start_time: TimeOfDay::parse("10:00").unwrap(),
            end_time: TimeOfDay::parse("12:00").unwrap(),
            classroom: "D201".into(),
            faculty: "Mühendislik".into(),
        };
        repo.create_exam(&mut exam).unwrap();

        let mut student =
            crate::models::Student::new("2025001", "Ayşe", "Yılmaz", "sifre", dept_id, 1);
        let student_id = db.students().create(&mut student).unwrap();

        // Kayıt yokken sınav listesi boş
        assert!(repo.exams_for_student(student_id).unwrap().is_empty());

        db.enrollments()
            .enroll(&crate::models::Enrollment::new(student_id, course_id, 1, "2025-2026"))
            .unwrap();

        let exams = repo.exams_for_student(student_id).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].exam_type, ExamType::Midterm);

        assert_eq!(repo.all_exams().unwrap().len(), 1);
    }

    #[test]
    fn test_enrolled_count() {
        let (db, dept_id) = setup();
        let repo = db.courses();

        let mut c = course(dept_id, "BM101");
        let course_id = repo.create(&mut c).unwrap();
        assert_eq!(repo.enrolled_count(course_id).unwrap(), 0);

        let mut student =
            crate::models::Student::new("2025001", "Ayşe", "Yılmaz", "sifre", dept_id, 1);
        let student_id = db.students().create(&mut student).unwrap();
        db.enrollments()
            .enroll(&crate::models::Enrollment::new(student_id, course_id, 1, "2025-2026"))
            .unwrap();

        assert_eq!(repo.enrolled_count(course_id).unwrap(), 1);
    }
}
