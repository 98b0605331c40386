//! Flat JSON file holding the verse chosen for each recent date.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use grace_types::api::ScriptureVerse;
use tracing::warn;

/// Dates kept in the file; older entries are pruned on write.
pub const MAX_DAYS: usize = 31;

pub struct DailyCache {
    path: PathBuf,
}

impl DailyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Missing or unreadable files read as empty.
    async fn load(&self) -> BTreeMap<String, ScriptureVerse> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("Verse cache {} unreadable: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Verse cache {} is corrupt, starting fresh: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    pub async fn get(&self, date: NaiveDate) -> Option<ScriptureVerse> {
        self.load().await.remove(&Self::key(date))
    }

    /// Best effort: a failed write is logged and otherwise ignored.
    pub async fn put(&self, date: NaiveDate, verse: &ScriptureVerse) {
        let mut entries = self.load().await;
        entries.insert(Self::key(date), verse.clone());
        // ISO dates sort chronologically, so the first keys are the oldest.
        while entries.len() > MAX_DAYS {
            entries.pop_first();
        }

        let json = match serde_json::to_string_pretty(&entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode verse cache: {}", e);
                return;
            }
        };
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, json).await {
            warn!("Failed to write verse cache {}: {}", tmp.display(), e);
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            warn!("Failed to replace verse cache {}: {}", self.path.display(), e);
        }
    }
}
