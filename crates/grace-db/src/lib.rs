pub mod entity;
pub mod memory;
pub mod migrations;
pub mod queries;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

pub use entity::Entity;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds this value.
    #[error("{0} already exists")]
    Conflict(String),

    #[error("unknown column '{column}' on {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt record: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Uniform CRUD surface over every [`Entity`]. Both stores list rows in
/// insertion order.
pub trait Storage: Send + Sync {
    fn insert<E: Entity>(&self, record: &E) -> Result<(), StoreError>;

    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError>;

    fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError>;

    /// Rows whose text column `column` equals `value`.
    fn find_by<E: Entity>(&self, column: &str, value: &str) -> Result<Vec<E>, StoreError>;

    /// Returns false when no row with the record's id exists.
    fn update<E: Entity>(&self, record: &E) -> Result<bool, StoreError>;

    /// Returns false when no row with `id` exists.
    fn delete<E: Entity>(&self, id: &str) -> Result<bool, StoreError>;

    fn count<E: Entity>(&self) -> Result<usize, StoreError> {
        Ok(self.list::<E>()?.len())
    }
}

pub(crate) fn ensure_column<E: Entity>(column: &str) -> Result<(), StoreError> {
    if E::COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(StoreError::UnknownColumn {
            table: E::TABLE,
            column: column.to_string(),
        })
    }
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&conn)
    }
}

/// The storage backend picked at startup.
pub enum Store {
    Sqlite(Database),
    Memory(MemoryStore),
}

impl Storage for Store {
    fn insert<E: Entity>(&self, record: &E) -> Result<(), StoreError> {
        match self {
            Store::Sqlite(db) => db.insert(record),
            Store::Memory(mem) => mem.insert(record),
        }
    }

    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        match self {
            Store::Sqlite(db) => db.get(id),
            Store::Memory(mem) => mem.get(id),
        }
    }

    fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        match self {
            Store::Sqlite(db) => db.list(),
            Store::Memory(mem) => mem.list(),
        }
    }

    fn find_by<E: Entity>(&self, column: &str, value: &str) -> Result<Vec<E>, StoreError> {
        match self {
            Store::Sqlite(db) => db.find_by(column, value),
            Store::Memory(mem) => mem.find_by(column, value),
        }
    }

    fn update<E: Entity>(&self, record: &E) -> Result<bool, StoreError> {
        match self {
            Store::Sqlite(db) => db.update(record),
            Store::Memory(mem) => mem.update(record),
        }
    }

    fn delete<E: Entity>(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Sqlite(db) => db.delete::<E>(id),
            Store::Memory(mem) => mem.delete::<E>(id),
        }
    }

    fn count<E: Entity>(&self) -> Result<usize, StoreError> {
        match self {
            Store::Sqlite(db) => db.count::<E>(),
            Store::Memory(mem) => mem.count::<E>(),
        }
    }
}
