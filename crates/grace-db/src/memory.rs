//! Process-lifetime store. Rows are kept as JSON documents per table, in
//! insertion order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::entity::Entity;
use crate::{Storage, StoreError, ensure_column};

type Tables = HashMap<&'static str, Vec<Value>>;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

fn field<'a>(doc: &'a Value, column: &str) -> Option<&'a str> {
    doc.get(column).and_then(Value::as_str)
}

/// Rejects `doc` if another row (a different id) shares a unique value.
fn check_unique<E: Entity>(rows: &[Value], doc: &Value, id: &str) -> Result<(), StoreError> {
    for column in E::UNIQUE {
        let Some(value) = field(doc, column) else {
            continue;
        };
        let taken = rows
            .iter()
            .any(|row| field(row, "id") != Some(id) && field(row, column) == Some(value));
        if taken {
            return Err(StoreError::Conflict(format!("{}.{}", E::TABLE, column)));
        }
    }
    Ok(())
}

impl Storage for MemoryStore {
    fn insert<E: Entity>(&self, record: &E) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        let mut tables = self.lock()?;
        let rows = tables.entry(E::TABLE).or_default();

        if rows.iter().any(|row| field(row, "id") == Some(record.id())) {
            return Err(StoreError::Conflict(format!("{}.id", E::TABLE)));
        }
        check_unique::<E>(rows, &doc, record.id())?;

        rows.push(doc);
        Ok(())
    }

    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        let tables = self.lock()?;
        let Some(rows) = tables.get(E::TABLE) else {
            return Ok(None);
        };
        rows.iter()
            .find(|row| field(row, "id") == Some(id))
            .map(|row| serde_json::from_value(row.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let tables = self.lock()?;
        let Some(rows) = tables.get(E::TABLE) else {
            return Ok(Vec::new());
        };
        rows.iter()
            .map(|row| serde_json::from_value(row.clone()).map_err(StoreError::from))
            .collect()
    }

    fn find_by<E: Entity>(&self, column: &str, value: &str) -> Result<Vec<E>, StoreError> {
        ensure_column::<E>(column)?;
        let tables = self.lock()?;
        let Some(rows) = tables.get(E::TABLE) else {
            return Ok(Vec::new());
        };
        rows.iter()
            .filter(|row| field(row, column) == Some(value))
            .map(|row| serde_json::from_value(row.clone()).map_err(StoreError::from))
            .collect()
    }

    fn update<E: Entity>(&self, record: &E) -> Result<bool, StoreError> {
        let doc = serde_json::to_value(record)?;
        let mut tables = self.lock()?;
        let Some(rows) = tables.get_mut(E::TABLE) else {
            return Ok(false);
        };
        let Some(index) = rows.iter().position(|row| field(row, "id") == Some(record.id())) else {
            return Ok(false);
        };
        check_unique::<E>(rows, &doc, record.id())?;
        rows[index] = doc;
        Ok(true)
    }

    fn delete<E: Entity>(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        let Some(rows) = tables.get_mut(E::TABLE) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|row| field(row, "id") != Some(id));
        Ok(rows.len() != before)
    }

    fn count<E: Entity>(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.get(E::TABLE).map_or(0, Vec::len))
    }
}
