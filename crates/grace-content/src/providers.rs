//! Live verse providers. A provider either returns a verse or reports itself
//! unavailable; the caller decides what to try next.

use async_trait::async_trait;
use grace_types::api::{ScriptureVerse, VerseSource};
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseRequest {
    Random,
    /// A human reference such as "John 3:16".
    Reference(String),
}

#[async_trait]
pub trait VerseProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, request: &VerseRequest) -> Result<ScriptureVerse, ProviderError>;
}

/// Collapse whitespace and strip inline markup some providers embed.
pub(crate) fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

async fn get_text(client: &Client, url: Url) -> Result<String, ProviderError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    Ok(resp.text().await?)
}

// -- bible-api.com --

pub struct BibleApi {
    client: Client,
    base_url: String,
}

impl BibleApi {
    pub const DEFAULT_BASE: &'static str = "https://bible-api.com/";

    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, request: &VerseRequest) -> Result<Url, ProviderError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        match request {
            VerseRequest::Random => {
                url.query_pairs_mut().append_pair("random", "verse");
            }
            VerseRequest::Reference(reference) => {
                url.path_segments_mut()
                    .map_err(|_| ProviderError::Malformed("base URL cannot hold a path".into()))?
                    .pop_if_empty()
                    .push(reference);
            }
        }
        Ok(url)
    }
}

#[derive(Deserialize)]
struct BibleApiBody {
    reference: String,
    text: String,
}

pub(crate) fn parse_bible_api(body: &str) -> Result<ScriptureVerse, ProviderError> {
    let parsed: BibleApiBody =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let text = clean_text(&parsed.text);
    let reference = parsed.reference.trim().to_string();
    if text.is_empty() || reference.is_empty() {
        return Err(ProviderError::Malformed("empty verse".into()));
    }
    Ok(ScriptureVerse {
        text,
        reference,
        theme: None,
        source: VerseSource::BibleApi,
    })
}

#[async_trait]
impl VerseProvider for BibleApi {
    fn name(&self) -> &'static str {
        "bible-api.com"
    }

    async fn fetch(&self, request: &VerseRequest) -> Result<ScriptureVerse, ProviderError> {
        let body = get_text(&self.client, self.url_for(request)?).await?;
        parse_bible_api(&body)
    }
}

// -- labs.bible.org --

pub struct LabsBible {
    client: Client,
    base_url: String,
}

impl LabsBible {
    pub const DEFAULT_BASE: &'static str = "https://labs.bible.org/api/";

    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, request: &VerseRequest) -> Result<Url, ProviderError> {
        let passage = match request {
            VerseRequest::Random => "random",
            VerseRequest::Reference(reference) => reference.as_str(),
        };
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("passage", passage)
            .append_pair("type", "json");
        Ok(url)
    }
}

#[derive(Deserialize)]
struct LabsVerse {
    bookname: String,
    chapter: String,
    verse: String,
    text: String,
}

pub(crate) fn parse_labs(body: &str) -> Result<ScriptureVerse, ProviderError> {
    let verses: Vec<LabsVerse> =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let (Some(first), Some(last)) = (verses.first(), verses.last()) else {
        return Err(ProviderError::Malformed("no verses".into()));
    };

    let reference = if verses.len() == 1 {
        format!("{} {}:{}", first.bookname, first.chapter, first.verse)
    } else {
        format!("{} {}:{}-{}", first.bookname, first.chapter, first.verse, last.verse)
    };
    let text = clean_text(
        &verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );
    if text.is_empty() {
        return Err(ProviderError::Malformed("empty verse".into()));
    }

    Ok(ScriptureVerse {
        text,
        reference,
        theme: None,
        source: VerseSource::LabsBible,
    })
}

#[async_trait]
impl VerseProvider for LabsBible {
    fn name(&self) -> &'static str {
        "labs.bible.org"
    }

    async fn fetch(&self, request: &VerseRequest) -> Result<ScriptureVerse, ProviderError> {
        let body = get_text(&self.client, self.url_for(request)?).await?;
        parse_labs(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bible_api_body() {
        let body = r#"{
            "reference": "John 3:16",
            "verses": [{"book_name": "John", "chapter": 3, "verse": 16, "text": "For God so loved the world\n"}],
            "text": "For God so loved the world,\nthat he gave his one and only Son\n",
            "translation_id": "web"
        }"#;
        let verse = parse_bible_api(body).unwrap();
        assert_eq!(verse.reference, "John 3:16");
        assert_eq!(verse.text, "For God so loved the world, that he gave his one and only Son");
        assert_eq!(verse.source, VerseSource::BibleApi);
    }

    #[test]
    fn bible_api_error_body_is_malformed() {
        assert!(matches!(
            parse_bible_api(r#"{"error": "not found"}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert!(parse_bible_api(r#"{"reference": "John 3:16", "text": "  "}"#).is_err());
    }

    #[test]
    fn labs_single_and_range() {
        let one = r#"[{"bookname":"Psalms","chapter":"46","verse":"10","text":"Be still, and know that <b>I am</b> God."}]"#;
        let verse = parse_labs(one).unwrap();
        assert_eq!(verse.reference, "Psalms 46:10");
        assert_eq!(verse.text, "Be still, and know that I am God.");

        let range = r#"[
            {"bookname":"Lamentations","chapter":"3","verse":"22","text":"The Lord's loyal kindness never ceases;"},
            {"bookname":"Lamentations","chapter":"3","verse":"23","text":"they are new every morning."}
        ]"#;
        let verse = parse_labs(range).unwrap();
        assert_eq!(verse.reference, "Lamentations 3:22-23");
        assert!(verse.text.ends_with("new every morning."));
        assert_eq!(verse.source, VerseSource::LabsBible);
    }

    #[test]
    fn labs_empty_array_is_malformed() {
        assert!(parse_labs("[]").is_err());
        assert!(parse_labs("<html>oops</html>").is_err());
    }

    #[test]
    fn request_urls() {
        let client = Client::new();
        let a = BibleApi::new(client.clone(), BibleApi::DEFAULT_BASE);
        assert_eq!(
            a.url_for(&VerseRequest::Random).unwrap().as_str(),
            "https://bible-api.com/?random=verse"
        );
        assert_eq!(
            a.url_for(&VerseRequest::Reference("John 3:16".into())).unwrap().as_str(),
            "https://bible-api.com/John%203:16"
        );

        let b = LabsBible::new(client, LabsBible::DEFAULT_BASE);
        assert_eq!(
            b.url_for(&VerseRequest::Reference("John 3:16".into())).unwrap().as_str(),
            "https://labs.bible.org/api/?passage=John+3%3A16&type=json"
        );
    }
}
