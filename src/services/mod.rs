//! Servisler: veri erişiminin üzerindeki iş kuralları
//!
//! Kayıt uygunluğu, türetilmiş bildirimler ve oturum yaşam döngüsü.

pub mod eligibility;
pub mod notifications;
pub mod session;

pub use eligibility::{check_eligibility, Eligibility, IneligibleReason};
pub use notifications::NotificationEngine;
pub use session::Session;
