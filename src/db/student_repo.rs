use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::Student;
use crate::utils::error::{AppError, AppResult};

pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    const COLUMNS: &'static str = "id, student_number, first_name, last_name, password,
                    department_id, class_year, gno, yno, created_at";

    /// Tüm öğrencileri getir (yönetim ekranı)
    pub fn find_all(&self) -> AppResult<Vec<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM students ORDER BY last_name, first_name",
            Self::COLUMNS
        ))?;

        let students = stmt
            .query_map([], |row| Ok(Self::row_to_student(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(students)
    }

    /// Öğrenciyi ID ile getir
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM students WHERE id = ?",
            Self::COLUMNS
        ))?;

        let student = stmt
            .query_row([id], |row| Ok(Self::row_to_student(row)))
            .ok();

        Ok(student)
    }

    /// Öğrenciyi numara ile getir
    pub fn find_by_number(&self, student_number: &str) -> AppResult<Option<Student>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM students WHERE student_number = ?",
            Self::COLUMNS
        ))?;

        let student = stmt
            .query_row([student_number], |row| Ok(Self::row_to_student(row)))
            .ok();

        Ok(student)
    }

    /// Numara + parola ile giriş denemesi. Parola düz metin eşitliğidir;
    /// uygulama yerel ve tek kullanıcılıdır.
    pub fn authenticate(&self, student_number: &str, password: &str) -> AppResult<Option<Student>> {
        let student = self.find_by_number(student_number)?;
        Ok(student.filter(|s| s.password == password))
    }

    /// Yeni öğrenci oluştur
    pub fn create(&self, student: &mut Student) -> AppResult<i64> {
        student.validate()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO students (student_number, first_name, last_name, password,
                                   department_id, class_year, gno, yno)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                student.student_number,
                student.first_name,
                student.last_name,
                student.password,
                student.department_id,
                student.class_year,
                student.gno,
                student.yno,
            ],
        )?;

        let id = conn.last_insert_rowid();
        student.id = Some(id);

        Ok(id)
    }

    /// Öğrenciyi güncelle
    pub fn update(&self, student: &Student) -> AppResult<()> {
        let id = student
            .id
            .ok_or_else(|| AppError::validation("Öğrencinin ID'si yok"))?;
        student.validate()?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE students SET
                student_number = ?1, first_name = ?2, last_name = ?3, password = ?4,
                department_id = ?5, class_year = ?6, gno = ?7, yno = ?8
             WHERE id = ?9",
            params![
                student.student_number,
                student.first_name,
                student.last_name,
                student.password,
                student.department_id,
                student.class_year,
                student.gno,
                student.yno,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Öğrenci {}", id)));
        }

        Ok(())
    }

    /// Öğrenciyi sil (kayıtları ve ayarları CASCADE ile gider)
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM students WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!("Öğrenci {}", id)));
        }

        Ok(())
    }

    fn row_to_student(row: &Row) -> Student {
        Student {
            id: row.get(0).ok(),
            student_number: row.get(1).unwrap_or_default(),
            first_name: row.get(2).unwrap_or_default(),
            last_name: row.get(3).unwrap_or_default(),
            password: row.get(4).unwrap_or_default(),
            department_id: row.get(5).unwrap_or_default(),
            class_year: row.get(6).unwrap_or(1),
            gno: row.get(7).unwrap_or_default(),
            yno: row.get(8).unwrap_or_default(),
            created_at: row.get(9).ok(),
        }
    }
}
