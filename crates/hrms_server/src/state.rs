//! Shared request state.
//!
//! # Responsibility
//! - Own the single SQLite connection behind a mutex.
//! - Hand out short-lived directory/ledger views per request.
//!
//! # Invariants
//! - Handlers never hold the connection lock across an await point; every
//!   core call is synchronous and releases the lock before responding.

use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct AppState {
    db: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Arc<Self> {
        Arc::new(Self {
            db: Mutex::new(conn),
        })
    }

    /// Locks the store connection for the duration of one core call.
    ///
    /// A poisoned lock only means an earlier handler panicked mid-request;
    /// the connection itself is still usable, so recover it.
    pub fn lock_db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
