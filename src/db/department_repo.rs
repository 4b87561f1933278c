use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::Department;
use crate::utils::error::{AppError, AppResult};

pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Tüm bölümleri getir
    pub fn find_all(&self) -> AppResult<Vec<Department>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, code, name, faculty FROM departments ORDER BY code",
        )?;

        let departments = stmt
            .query_map([], |row| Ok(Self::row_to_department(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(departments)
    }

    /// Bölümü ID ile getir
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Department>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, code, name, faculty FROM departments WHERE id = ?",
        )?;

        let department = stmt
            .query_row([id], |row| Ok(Self::row_to_department(row)))
            .ok();

        Ok(department)
    }

    /// Yeni bölüm oluştur
    pub fn create(&self, department: &mut Department) -> AppResult<i64> {
        department.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO departments (code, name, faculty) VALUES (?1, ?2, ?3)",
            params![department.code, department.name, department.faculty],
        )?;

        let id = conn.last_insert_rowid();
        department.id = Some(id);

        Ok(id)
    }

    /// Bölümü güncelle
    pub fn update(&self, department: &Department) -> AppResult<()> {
        let id = department
            .id
            .ok_or_else(|| AppError::validation("Bölümün ID'si yok"))?;
        department.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE departments SET code = ?1, name = ?2, faculty = ?3 WHERE id = ?4",
            params![department.code, department.name, department.faculty, id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Bölüm {}", id)));
        }

        Ok(())
    }

    /// Bölümü sil. Bölüme bağlı ders ya da öğrenci varken silme
    /// uygulama katmanında reddedilir.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();

        let course_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM courses WHERE department_id = ?",
            [id],
            |row| row.get(0),
        )?;
        if course_count > 0 {
            return Err(AppError::validation(format!(
                "Bölüme bağlı {} ders var, önce onları silin",
                course_count
            )));
        }

        let student_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE department_id = ?",
            [id],
            |row| row.get(0),
        )?;
        if student_count > 0 {
            return Err(AppError::validation(format!(
                "Bölüme kayıtlı {} öğrenci var, önce onları taşıyın",
                student_count
            )));
        }

        let rows = conn.execute("DELETE FROM departments WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Bölüm {}", id)));
        }

        Ok(())
    }

    fn row_to_department(row: &Row) -> Department {
        Department {
            id: row.get(0).ok(),
            code: row.get(1).unwrap_or_default(),
            name: row.get(2).unwrap_or_default(),
            faculty: row.get(3).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.departments();

        let mut dept = Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
        let id = repo.create(&mut dept).unwrap();
        assert!(id > 0);

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.code, "BM");
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.departments();

        let mut d1 = Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
        let mut d2 = Department::new("BM", "Başka", "Mühendislik");

        repo.create(&mut d1).unwrap();
        let err = repo.create(&mut d2).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn test_delete_blocked_by_courses() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.departments();

        let mut dept = Department::new("BM", "Bilgisayar Mühendisliği", "Mühendislik");
        let dept_id = repo.create(&mut dept).unwrap();

        let mut course = crate::models::Course {
            id: None,
            code: "BM101".into(),
            name: "Programlamaya Giriş".into(),
            department_id: dept_id,
            class_year: 1,
            semester: 1,
            credits: 3,
            ects: 5,
            is_mandatory: true,
            instructor: "Dr. Demir".into(),
            quota: 40,
        };
        db.courses().create(&mut course).unwrap();

        let err = repo.delete(dept_id).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        db.courses().delete(course.id.unwrap()).unwrap();
        repo.delete(dept_id).unwrap();
        assert!(repo.find_by_id(dept_id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.departments().delete(999).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
