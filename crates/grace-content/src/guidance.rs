//! Emotional-guidance chat. Keyword emotion detection and canned responses,
//! optionally replaced by a hosted text-generation model.

use std::time::Duration;

use grace_types::api::{GuidanceResponse, GuidanceSource};
use rand::seq::IndexedRandom;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::providers::ProviderError;
use crate::verses;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Anxious,
    Sad,
    Angry,
    Lonely,
    Grateful,
    Fearful,
    Seeking,
}

impl Emotion {
    const DETECTABLE: [Emotion; 6] = [
        Emotion::Anxious,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Lonely,
        Emotion::Grateful,
        Emotion::Fearful,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anxious => "anxious",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Lonely => "lonely",
            Emotion::Grateful => "grateful",
            Emotion::Fearful => "fearful",
            Emotion::Seeking => "seeking",
        }
    }

    /// Verse theme offered alongside the response.
    pub fn theme(self) -> &'static str {
        match self {
            Emotion::Anxious => "peace",
            Emotion::Sad => "comfort",
            Emotion::Angry => "forgiveness",
            Emotion::Lonely => "love",
            Emotion::Grateful => "gratitude",
            Emotion::Fearful => "courage",
            Emotion::Seeking => "wisdom",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Emotion::Anxious => &["anxious", "anxiety", "worried", "worry", "stressed", "stress", "overwhelmed", "nervous", "panic"],
            Emotion::Sad => &["sad", "depressed", "grief", "grieving", "crying", "heartbroken", "hopeless", "loss", "mourning"],
            Emotion::Angry => &["angry", "anger", "furious", "mad", "bitter", "resent", "frustrated", "betrayed"],
            Emotion::Lonely => &["lonely", "alone", "isolated", "abandoned", "forgotten", "unloved", "rejected"],
            Emotion::Grateful => &["grateful", "thankful", "blessed", "thank", "joy", "joyful", "happy", "praise"],
            Emotion::Fearful => &["afraid", "scared", "fear", "terrified", "frightened", "dread"],
            Emotion::Seeking => &[],
        }
    }

    fn templates(self) -> &'static [&'static str] {
        match self {
            Emotion::Anxious => &[
                "It sounds like a lot is pressing on you right now. Take a slow breath and hand each worry to God one at a time; you do not have to carry them all at once.",
                "Anxiety can make everything feel urgent. Try naming what you are worried about in prayer and ask for peace for just this next hour.",
            ],
            Emotion::Sad => &[
                "I'm sorry you're hurting. Sorrow is not a lack of faith; even Jesus wept. Let yourself grieve, and know that God draws near to the brokenhearted.",
                "Heavy days are real. Consider sharing this with someone you trust today, and rest in the promise that you are held even when you feel weak.",
            ],
            Emotion::Angry => &[
                "Anger is a signal that something matters to you. Bring it honestly before God before you act on it, and ask for wisdom about the next right step.",
                "It is okay to be angry. Consider writing out what happened and praying over it; forgiveness is a process, not a switch.",
            ],
            Emotion::Lonely => &[
                "Feeling alone is painful. You are seen and loved by God, and reaching out to one person today, even with a short message, can be a gift to you both.",
                "Loneliness tells us we were made for connection. The support network here is a safe place to share, and you are welcome in it.",
            ],
            Emotion::Grateful => &[
                "What a gift to notice the good! Consider writing down three things you're thankful for today and sharing one with someone else.",
                "Gratitude turns what we have into enough. Thank you for sharing this joy; let it overflow into encouragement for someone else.",
            ],
            Emotion::Fearful => &[
                "Fear can feel overwhelming, but you are not facing this alone. Name the fear aloud in prayer and hold on to the promise that God goes with you.",
                "Courage is not the absence of fear but trust in the middle of it. Take one small faithful step today.",
            ],
            Emotion::Seeking => &[
                "Thank you for sharing what's on your heart. Spend a few quiet minutes in prayer and Scripture today, and listen for what God may be saying.",
                "Every question is welcome here. Consider today's devotional as a starting point, and bring your questions honestly to God.",
            ],
        }
    }
}

/// Keyword match on lowercased words; the first emotion with a hit wins.
pub fn detect_emotion(message: &str) -> Emotion {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    Emotion::DETECTABLE
        .into_iter()
        .find(|emotion| emotion.keywords().iter().any(|k| words.contains(k)))
        .unwrap_or(Emotion::Seeking)
}

/// Hosted inference settings. Without them guidance is template-only.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub token: String,
    pub model: String,
    pub base_url: String,
}

impl InferenceConfig {
    pub const DEFAULT_BASE: &'static str = "https://api-inference.huggingface.co/models/";
}

pub struct Guidance {
    client: Client,
    inference: Option<InferenceConfig>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

pub(crate) fn parse_generated(body: &str) -> Result<String, ProviderError> {
    let generated: Vec<Generated> =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    generated
        .into_iter()
        .map(|g| g.generated_text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or_else(|| ProviderError::Malformed("empty generation".into()))
}

impl Guidance {
    pub fn new(client: Client, inference: Option<InferenceConfig>, timeout: Duration) -> Self {
        Self {
            client,
            inference,
            timeout,
        }
    }

    async fn generate(&self, config: &InferenceConfig, emotion: Emotion, message: &str) -> Result<String, ProviderError> {
        let prompt = format!(
            "You are a gentle Christian encourager. The person feels {}. Reply with two or three warm, hopeful sentences.\nPerson: {}\nEncourager:",
            emotion.as_str(),
            message
        );
        let url = format!("{}{}", config.base_url, config.model);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&config.token)
            .timeout(self.timeout)
            .json(&serde_json::json!({
                "inputs": prompt,
                "parameters": { "max_new_tokens": 120, "return_full_text": false }
            }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        parse_generated(&resp.text().await?)
    }

    fn template(emotion: Emotion) -> String {
        let templates = emotion.templates();
        templates
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(templates[0])
            .to_string()
    }

    pub async fn respond(&self, message: &str) -> GuidanceResponse {
        let emotion = detect_emotion(message);

        let generated = match &self.inference {
            Some(config) => match self.generate(config, emotion, message).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Guidance model unavailable, using templates: {}", e);
                    None
                }
            },
            None => None,
        };
        let (response, source) = match generated {
            Some(text) => (text, GuidanceSource::Model),
            None => (Self::template(emotion), GuidanceSource::Template),
        };

        let verse = verses::random_with_theme(emotion.theme())
            .unwrap_or_else(verses::random)
            .to_verse();

        GuidanceResponse {
            emotion: emotion.as_str().to_string(),
            response,
            verse,
            source,
        }
    }
}
