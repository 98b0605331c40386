use rusqlite::{Connection, ErrorCode, params_from_iter};

use crate::entity::Entity;
use crate::{Database, Storage, StoreError, ensure_column};

impl Storage for Database {
    fn insert<E: Entity>(&self, record: &E) -> Result<(), StoreError> {
        let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders.join(", ")
        );

        self.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(record.params()))
                .map_err(write_error::<E>)?;
            Ok(())
        })
    }

    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        let sql = format!("{} WHERE id = ?1", select_all::<E>());
        self.with_conn(|conn| conn.query_row(&sql, [id], |row| E::from_row(row)).optional())
    }

    fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let sql = format!("{} ORDER BY rowid", select_all::<E>());
        self.with_conn(|conn| query_rows(conn, &sql, None))
    }

    fn find_by<E: Entity>(&self, column: &str, value: &str) -> Result<Vec<E>, StoreError> {
        ensure_column::<E>(column)?;
        let sql = format!("{} WHERE {} = ?1 ORDER BY rowid", select_all::<E>(), column);
        self.with_conn(|conn| query_rows(conn, &sql, Some(value)))
    }

    fn update<E: Entity>(&self, record: &E) -> Result<bool, StoreError> {
        // Parameter numbering follows COLUMNS, so ?1 is the id.
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, col)| format!("{} = ?{}", col, i + 1))
            .collect();
        let sql = format!("UPDATE {} SET {} WHERE id = ?1", E::TABLE, assignments.join(", "));

        self.with_conn(|conn| {
            let changed = conn
                .execute(&sql, params_from_iter(record.params()))
                .map_err(write_error::<E>)?;
            Ok(changed > 0)
        })
    }

    fn delete<E: Entity>(&self, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
        self.with_conn(|conn| Ok(conn.execute(&sql, [id])? > 0))
    }

    fn count<E: Entity>(&self) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }
}

fn select_all<E: Entity>() -> String {
    format!("SELECT {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
}

fn query_rows<E: Entity>(conn: &Connection, sql: &str, value: Option<&str>) -> Result<Vec<E>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = match value {
        Some(v) => stmt.query_map([v], E::from_row)?,
        None => stmt.query_map([], E::from_row)?,
    }
    .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Constraint failures ("UNIQUE constraint failed: users.email") become conflicts.
fn write_error<E: Entity>(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(code, msg) if code.code == ErrorCode::ConstraintViolation => {
            let target = msg
                .as_deref()
                .and_then(|m| m.rsplit(": ").next())
                .unwrap_or(E::TABLE);
            StoreError::Conflict(target.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, StoreError>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, StoreError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
