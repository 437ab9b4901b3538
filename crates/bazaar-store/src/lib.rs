// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed repository for the bazaar order service.
//!
//! Queries return fully populated value structures; writes run inside one
//! transaction per operation. Updates that race a concurrent writer report a
//! typed [`UpdateOutcome`] instead of surfacing a database error.

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

mod read;
mod row;
mod schema;
mod views;
mod write;

pub use views::{CartView, LineItemView, OrderDetail, OrderSummary};
pub use write::UpdateOutcome;

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}

/// Handle to one on-disk database. Cheap to clone behind an `Arc`; every
/// call opens its own connection on a blocking thread, and writers are
/// serialized through a single permit.
pub struct Store {
    path: PathBuf,
    write_gate: Arc<Semaphore>,
}

impl Store {
    /// Opens (creating if needed) the database at `path` and applies the
    /// schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Arc<Self>, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        configure_connection(&conn)?;
        schema::ensure_schema(&conn)?;
        Ok(Arc::new(Self {
            path,
            write_gate: Arc::new(Semaphore::new(1)),
        }))
    }

    /// Liveness probe used by readiness checks.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.read(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
    }

    pub(crate) async fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            configure_connection(&conn)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError(e.to_string()))?
    }

    pub(crate) async fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .write_gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| StoreError(e.to_string()))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&path)?;
            configure_connection(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError(e.to_string()))?
    }
}

fn configure_connection(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA synchronous=NORMAL;")?;
    // journal_mode returns the resulting mode as a row.
    conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.set_prepared_statement_cache_capacity(64);
    Ok(())
}
