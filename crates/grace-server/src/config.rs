use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use grace_content::InferenceConfig;

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub production: bool,
    pub storage: StorageKind,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub admin_emails: Vec<String>,
    pub verse_cache: PathBuf,
    pub provider_timeout: Duration,
    pub inference: Option<InferenceConfig>,
    pub static_dir: PathBuf,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let production = var_or("GRACE_ENV", "development").eq_ignore_ascii_case("production");

        let port: u16 = var_or("PORT", "5000").parse().context("PORT must be a port number")?;

        let storage = match var_or("GRACE_STORAGE", "sqlite").to_lowercase().as_str() {
            "sqlite" => StorageKind::Sqlite,
            "memory" => StorageKind::Memory,
            other => bail!("GRACE_STORAGE must be 'sqlite' or 'memory', got '{}'", other),
        };

        let jwt_secret = var_or("GRACE_JWT_SECRET", DEV_SECRET);
        if production && jwt_secret == DEV_SECRET {
            bail!("GRACE_JWT_SECRET must be set in production");
        }

        let admin_emails = parse_emails(&var_or("GRACE_ADMIN_EMAILS", ""));

        let timeout_secs: u64 = var_or("GRACE_PROVIDER_TIMEOUT_SECS", "5")
            .parse()
            .context("GRACE_PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?;

        let inference = env::var("HUGGINGFACE_API_KEY")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(|token| InferenceConfig {
                token,
                model: var_or("GRACE_HF_MODEL", "microsoft/DialoGPT-medium"),
                base_url: InferenceConfig::DEFAULT_BASE.to_string(),
            });

        Ok(Self {
            host: var_or("GRACE_HOST", "0.0.0.0"),
            port,
            production,
            storage,
            db_path: var_or("GRACE_DB_PATH", "grace.db").into(),
            jwt_secret,
            admin_emails,
            verse_cache: var_or("GRACE_VERSE_CACHE", "verse-cache.json").into(),
            provider_timeout: Duration::from_secs(timeout_secs),
            inference,
            static_dir: var_or("GRACE_STATIC_DIR", "dist/public").into(),
        })
    }
}

/// Comma separated, trimmed and lowercased; blanks dropped.
fn parse_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_email_list() {
        assert_eq!(
            parse_emails(" Pastor@Example.com, ,elder@example.com "),
            vec!["pastor@example.com", "elder@example.com"]
        );
        assert!(parse_emails("").is_empty());
    }
}
