//! Kampüs Asistanı - üniversite kampüs uygulamasının yerel veri katmanı
//!
//! Ders programları, yemekhane menüleri, akademik takvim, duyurular ve
//! türetilmiş bildirimler; hepsi tek bir SQLite dosyası üzerinden.
//! Ekranlar (sunum katmanı) bu crate'in dışında yaşar ve buradaki
//! repository/servis API'sini çağırır.

#![allow(dead_code)]

pub mod models;
pub mod db;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
pub use services::{Eligibility, IneligibleReason, NotificationEngine, Session};
pub use utils::date::{TimeOfDay, Weekday};
pub use utils::error::{AppError, AppResult};
