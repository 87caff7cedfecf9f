//! Library schema registry and executor.
//!
//! # Responsibility
//! - Create the fixed library schema on first open.
//! - Refuse databases stamped by a newer schema.
//!
//! # Invariants
//! - Registered versions are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaScript {
    version: u32,
    sql: &'static str,
}

const SCHEMA_SCRIPTS: &[SchemaScript] = &[SchemaScript {
    version: 1,
    sql: include_str!("0001_library.sql"),
}];

/// Returns the latest schema version known by this build.
pub fn latest_version() -> u32 {
    SCHEMA_SCRIPTS.last().map_or(0, |script| script.version)
}

/// Applies every schema script newer than the database's `user_version`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for script in SCHEMA_SCRIPTS.iter().filter(|s| s.version > current) {
        tx.execute_batch(script.sql)?;
        tx.pragma_update(None, "user_version", script.version)?;
    }
    tx.commit()?;

    info!("event=schema_apply module=db status=ok from_version={current} to_version={latest}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
