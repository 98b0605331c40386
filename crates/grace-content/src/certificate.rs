//! Donor-recognition certificates: a template, a verse and a prayer line
//! rendered into a text block with a verification code.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use grace_types::models::{Certificate, Contributor};
use sha2::{Digest, Sha256};

use crate::verses;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Gratitude,
    Partnership,
    Blessing,
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gratitude" => Ok(Template::Gratitude),
            "partnership" => Ok(Template::Partnership),
            "blessing" => Ok(Template::Blessing),
            other => Err(format!("unknown certificate template '{}'", other)),
        }
    }
}

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::Gratitude => "gratitude",
            Template::Partnership => "partnership",
            Template::Blessing => "blessing",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Template::Gratitude => "Certificate of Gratitude",
            Template::Partnership => "Certificate of Partnership",
            Template::Blessing => "Certificate of Blessing",
        }
    }

    fn dedication(self) -> &'static str {
        match self {
            Template::Gratitude => "With heartfelt thanks for your generous gift to this ministry.",
            Template::Partnership => "In recognition of your faithful partnership in sharing hope.",
            Template::Blessing => "May your generosity return to you as blessing upon blessing.",
        }
    }

    fn theme(self) -> &'static str {
        match self {
            Template::Gratitude => "gratitude",
            Template::Partnership => "love",
            Template::Blessing => "hope",
        }
    }

    fn prayer(self) -> &'static str {
        match self {
            Template::Gratitude => "Lord, thank you for this cheerful giver. Multiply their gift and fill their home with joy.",
            Template::Partnership => "Father, strengthen this partner in every good work and let them see the fruit of their labour.",
            Template::Blessing => "The LORD bless thee, and keep thee: the LORD make his face shine upon thee, and be gracious unto thee.",
        }
    }
}

/// First 12 hex digits of SHA-256 over id and body, uppercased.
pub fn verification_code(id: &str, body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(b"\n");
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())[..12].to_uppercase()
}

pub fn issue(id: String, contributor: &Contributor, template: Template, issued_at: DateTime<Utc>) -> Certificate {
    let verse = verses::random_with_theme(template.theme()).unwrap_or_else(verses::random);
    let prayer = template.prayer();

    let body = format!(
        "{title}\n\nPresented to {name}\n\n{dedication}\n\n\"{text}\"\n({reference})\n\n{prayer}\n\nIssued {date}",
        title = template.title(),
        name = contributor.name,
        dedication = template.dedication(),
        text = verse.text,
        reference = verse.reference,
        prayer = prayer,
        date = issued_at.format("%B %-d, %Y"),
    );
    let verification_code = verification_code(&id, &body);

    Certificate {
        id,
        contributor_id: contributor.id.clone(),
        template: template.as_str().to_string(),
        verse_text: verse.text.to_string(),
        verse_reference: verse.reference.to_string(),
        prayer: prayer.to_string(),
        body,
        verification_code,
        created_at: issued_at,
    }
}
