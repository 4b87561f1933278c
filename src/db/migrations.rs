use rusqlite::Connection;
use tracing::info;

use super::schema::{CREATE_TABLES, SCHEMA_VERSION};
use crate::utils::error::AppResult;

/// Gerekli tüm migrasyonları çalıştır
pub fn run_migrations(conn: &Connection) -> AppResult<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        info!("Yeni veritabanı oluşturuluyor, şema sürümü {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Veritabanı {} sürümünden {} sürümüne taşınıyor",
            current_version, SCHEMA_VERSION
        );
        migrate_from(conn, current_version)?;
    } else {
        info!("Veritabanı güncel (sürüm {})", current_version);
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(CREATE_TABLES)?;

    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    info!("İlk kurulum tamamlandı");
    Ok(())
}

fn migrate_from(conn: &Connection, from_version: i32) -> AppResult<()> {
    for version in (from_version + 1)..=SCHEMA_VERSION {
        // Sürüm 1 ilk şema; ileri migrasyonlar buraya eklenir
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;

        info!("Sürüm {} uygulandı", version);
    }

    Ok(())
}
