use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Veritabanı hatası: {0}")]
    Database(rusqlite::Error),

    #[error("G/Ç hatası: {0}")]
    Io(#[from] std::io::Error),

    #[error("Doğrulama hatası: {0}")]
    Validation(String),

    #[error("Bulunamadı: {0}")]
    NotFound(String),

    #[error("Zaten mevcut: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

// SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
const SQLITE_UNIQUE: i32 = 2067;
const SQLITE_PRIMARYKEY: i32 = 1555;

/// Tekil anahtar ihlali kullanıcı girdisiyle düzeltilebilir bir durumdur,
/// diğer SQLite hataları depolama hatası olarak kalır.
impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == SQLITE_UNIQUE || e.extended_code == SQLITE_PRIMARYKEY =>
            {
                Self::AlreadyExists(err.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_maps_to_already_exists() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (code TEXT UNIQUE);").unwrap();
        conn.execute("INSERT INTO t (code) VALUES ('BM')", []).unwrap();

        let err: AppError = conn
            .execute("INSERT INTO t (code) VALUES ('BM')", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn test_other_sqlite_errors_stay_database() {
        let conn = Connection::open_in_memory().unwrap();
        let err: AppError = conn.execute("SELECT * FROM yok", []).unwrap_err().into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
