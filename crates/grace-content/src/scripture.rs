//! Verse lookup with fallback: provider A, then provider B, then the
//! built-in table. No retries and no backoff; one attempt per provider.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use grace_types::api::ScriptureVerse;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::DailyCache;
use crate::providers::{BibleApi, LabsBible, ProviderError, VerseProvider, VerseRequest};
use crate::verses;

pub struct Scripture {
    providers: Vec<Box<dyn VerseProvider>>,
    timeout: Duration,
    cache: DailyCache,
    /// Held across the whole daily lookup so a date is fetched once. Also
    /// remembers the last verse served, in case the cache file is unwritable.
    daily: Mutex<Option<(NaiveDate, ScriptureVerse)>>,
}

impl Scripture {
    pub fn new(providers: Vec<Box<dyn VerseProvider>>, timeout: Duration, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            providers,
            timeout,
            cache: DailyCache::new(cache_path),
            daily: Mutex::new(None),
        }
    }

    /// bible-api.com first, labs.bible.org second.
    pub fn with_default_providers(client: Client, timeout: Duration, cache_path: impl Into<PathBuf>) -> Self {
        let providers: Vec<Box<dyn VerseProvider>> = vec![
            Box::new(BibleApi::new(client.clone(), BibleApi::DEFAULT_BASE)),
            Box::new(LabsBible::new(client, LabsBible::DEFAULT_BASE)),
        ];
        Self::new(providers, timeout, cache_path)
    }

    async fn fetch_live(&self, request: &VerseRequest) -> Option<ScriptureVerse> {
        for provider in &self.providers {
            let outcome = tokio::time::timeout(self.timeout, provider.fetch(request))
                .await
                .unwrap_or(Err(ProviderError::Timeout));
            match outcome {
                Ok(verse) => {
                    debug!("Verse from {}: {}", provider.name(), verse.reference);
                    return Some(verse);
                }
                Err(e) => warn!("Verse provider {} unavailable: {}", provider.name(), e),
            }
        }
        None
    }

    pub async fn daily_verse(&self) -> ScriptureVerse {
        self.daily_verse_for(Local::now().date_naive()).await
    }

    /// Same date, same verse: once a verse is cached for `date` it is returned
    /// verbatim.
    pub async fn daily_verse_for(&self, date: NaiveDate) -> ScriptureVerse {
        let mut last = self.daily.lock().await;

        if let Some((day, verse)) = last.as_ref() {
            if *day == date {
                return verse.clone();
            }
        }
        if let Some(cached) = self.cache.get(date).await {
            *last = Some((date, cached.clone()));
            return cached;
        }

        let verse = match self.fetch_live(&VerseRequest::Random).await {
            Some(verse) => verse,
            None => verses::for_day_of_month(date.day()).to_verse(),
        };
        self.cache.put(date, &verse).await;
        *last = Some((date, verse.clone()));
        verse
    }

    /// Never cached. An unknown theme is treated as no theme.
    pub async fn random_verse(&self, theme: Option<&str>) -> ScriptureVerse {
        let theme = theme
            .map(|t| t.trim().to_lowercase())
            .filter(|t| verses::has_theme(t));

        let Some(theme) = theme else {
            if let Some(verse) = self.fetch_live(&VerseRequest::Random).await {
                return verse;
            }
            return verses::random().to_verse();
        };

        let Some(entry) = verses::random_with_theme(&theme) else {
            return verses::random().to_verse();
        };
        let request = VerseRequest::Reference(entry.reference.to_string());
        match self.fetch_live(&request).await {
            Some(mut verse) => {
                verse.theme = Some(theme);
                verse
            }
            None => entry.to_verse(),
        }
    }

    pub fn themes(&self) -> Vec<&'static str> {
        verses::themes()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use grace_types::api::VerseSource;

    use super::*;

    /// Scripted provider for exercising the chain.
    struct Stub {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    #[derive(Clone, Copy)]
    enum Behaviour {
        Ok(VerseSource),
        Fail,
        Hang,
    }

    impl Stub {
        fn boxed(name: &'static str, behaviour: Behaviour) -> (Box<dyn VerseProvider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Stub {
                name,
                behaviour,
                calls: calls.clone(),
            };
            (Box::new(stub), calls)
        }
    }

    #[async_trait]
    impl VerseProvider for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, request: &VerseRequest) -> Result<ScriptureVerse, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Ok(source) => Ok(ScriptureVerse {
                    text: format!("{} verse #{}", self.name, n),
                    reference: match request {
                        VerseRequest::Random => format!("{} 1:{}", self.name, n),
                        VerseRequest::Reference(r) => r.clone(),
                    },
                    theme: None,
                    source,
                }),
                Behaviour::Fail => Err(ProviderError::Status(503)),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(ProviderError::Timeout)
                }
            }
        }
    }

    fn service(dir: &tempfile::TempDir, providers: Vec<Box<dyn VerseProvider>>) -> Scripture {
        Scripture::new(providers, Duration::from_millis(100), dir.path().join("verse-cache.json"))
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[tokio::test]
    async fn daily_verse_is_stable_within_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let (a, calls) = Stub::boxed("a", Behaviour::Ok(VerseSource::BibleApi));
        let scripture = service(&dir, vec![a]);

        let first = scripture.daily_verse_for(date(18)).await;
        let second = scripture.daily_verse_for(date(18)).await;
        assert_eq!(first, second);
        assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let next_day = scripture.daily_verse_for(date(19)).await;
        assert_ne!(first, next_day);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn daily_verse_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = Stub::boxed("a", Behaviour::Ok(VerseSource::BibleApi));
        let first = service(&dir, vec![a]).daily_verse_for(date(18)).await;

        // A fresh service whose providers would all fail still returns the cached verse.
        let (b, calls) = Stub::boxed("b", Behaviour::Fail);
        let again = service(&dir, vec![b]).daily_verse_for(date(18)).await;
        assert_eq!(first, again);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn daily_verse_is_stable_when_cache_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let (a, calls) = Stub::boxed("a", Behaviour::Ok(VerseSource::BibleApi));
        let path = dir.path().join("missing-dir").join("verse-cache.json");
        let scripture = Scripture::new(vec![a], Duration::from_millis(100), path.clone());

        let first = scripture.daily_verse_for(date(18)).await;
        let second = scripture.daily_verse_for(date(18)).await;
        assert!(!path.exists());
        assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn daily_falls_back_to_second_provider() {
        let dir = tempfile::tempdir().unwrap();
        let (a, a_calls) = Stub::boxed("a", Behaviour::Fail);
        let (b, b_calls) = Stub::boxed("b", Behaviour::Ok(VerseSource::LabsBible));
        let verse = service(&dir, vec![a, b]).daily_verse_for(date(18)).await;

        assert_eq!(verse.source, VerseSource::LabsBible);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn daily_falls_back_to_day_of_month_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = Stub::boxed("a", Behaviour::Fail);
        let (b, _) = Stub::boxed("b", Behaviour::Fail);
        let verse = service(&dir, vec![a, b]).daily_verse_for(date(4)).await;

        assert_eq!(verse, verses::for_day_of_month(4).to_verse());
    }

    #[tokio::test]
    async fn random_verse_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (a, a_calls) = Stub::boxed("a", Behaviour::Fail);
        let (b, b_calls) = Stub::boxed("b", Behaviour::Fail);
        let scripture = service(&dir, vec![a, b]);

        for _ in 0..5 {
            let verse = scripture.random_verse(None).await;
            assert_eq!(verse.source, VerseSource::Static);
            assert!(!verse.text.is_empty());
        }
        assert_eq!(a_calls.load(Ordering::SeqCst), 5);
        assert_eq!(b_calls.load(Ordering::SeqCst), 5);
        // Random lookups never touch the daily cache.
        assert!(!dir.path().join("verse-cache.json").exists());
    }

    #[tokio::test]
    async fn hung_provider_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = Stub::boxed("a", Behaviour::Hang);
        let (b, _) = Stub::boxed("b", Behaviour::Ok(VerseSource::LabsBible));
        let verse = service(&dir, vec![a, b]).random_verse(None).await;
        assert_eq!(verse.source, VerseSource::LabsBible);
    }

    #[tokio::test]
    async fn themed_verse_asks_for_a_reference_of_that_theme() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = Stub::boxed("a", Behaviour::Ok(VerseSource::BibleApi));
        let verse = service(&dir, vec![a]).random_verse(Some(" Peace ")).await;

        assert_eq!(verse.theme.as_deref(), Some("peace"));
        assert_eq!(verse.source, VerseSource::BibleApi);
        assert!(
            verses::STATIC_VERSES
                .iter()
                .any(|v| v.theme == "peace" && v.reference == verse.reference)
        );
    }

    #[tokio::test]
    async fn themed_verse_falls_back_to_table() {
        let dir = tempfile::tempdir().unwrap();
        let verse = service(&dir, Vec::new()).random_verse(Some("courage")).await;
        assert_eq!(verse.source, VerseSource::Static);
        assert_eq!(verse.theme.as_deref(), Some("courage"));
    }

    #[tokio::test]
    async fn unknown_theme_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let verse = service(&dir, Vec::new()).random_verse(Some("lottery")).await;
        assert_eq!(verse.source, VerseSource::Static);
    }
}
