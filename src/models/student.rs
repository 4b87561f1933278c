use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Öğrenci kaydı. Parola düz metin eşitlik kontrolüyle doğrulanır;
/// uygulama tek kullanıcılı ve tamamen yereldir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Option<i64>,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub department_id: i64,
    /// Sınıf (1-4)
    pub class_year: i32,
    /// Genel not ortalaması
    pub gno: f64,
    /// Yıllık not ortalaması
    pub yno: f64,
    pub created_at: Option<String>,
}

impl Student {
    pub fn new(
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
        department_id: i64,
        class_year: i32,
    ) -> Self {
        Self {
            id: None,
            student_number: student_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            department_id,
            class_year,
            gno: 0.0,
            yno: 0.0,
            created_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.student_number.trim().is_empty() {
            return Err(AppError::validation("Öğrenci numarası boş olamaz"));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::validation("Ad ve soyad boş olamaz"));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("Parola boş olamaz"));
        }
        if !(1..=4).contains(&self.class_year) {
            return Err(AppError::validation("Sınıf 1 ile 4 arasında olmalı"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let mut s = Student::new("2025001", "Ayşe", "Yılmaz", "sifre", 1, 2);
        assert!(s.validate().is_ok());

        s.class_year = 5;
        assert!(s.validate().is_err());

        s.class_year = 2;
        s.student_number = "  ".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_full_name() {
        let s = Student::new("2025001", "Ayşe", "Yılmaz", "sifre", 1, 2);
        assert_eq!(s.full_name(), "Ayşe Yılmaz");
    }
}
