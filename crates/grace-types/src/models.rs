//! Domain records. Every record is a flat row keyed by a string UUID;
//! relationships are plain ids (`challenge_id`, `request_id`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::validate::{Checks, FieldError, Validate};

/// Anything stored in a table.
pub trait Record: Clone + Send + Sync + 'static {
    /// Singular name used in messages ("devotional not found").
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// A record the admin panel can create and edit from a request body.
pub trait Resource: Record {
    type Input: DeserializeOwned + Validate + Send + 'static;

    fn create(id: String, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Replace the editable fields. Id and creation time are kept.
    fn apply(&mut self, input: Self::Input);
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "general".to_string()
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for User {
    const KIND: &'static str = "user";
    fn id(&self) -> &str {
        &self.id
    }
}

// -- Devotionals --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devotional {
    pub id: String,
    pub title: String,
    pub content: String,
    pub verse_text: String,
    pub verse_reference: String,
    pub publish_date: NaiveDate,
    pub author: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DevotionalInput {
    pub title: String,
    pub content: String,
    pub verse_text: String,
    pub verse_reference: String,
    pub publish_date: NaiveDate,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for DevotionalInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("title", &self.title)
            .max_len("title", &self.title, 200)
            .required("content", &self.content)
            .required("verse_text", &self.verse_text)
            .required("verse_reference", &self.verse_reference)
            .max_len("verse_reference", &self.verse_reference, 100)
            .max_len("author", &self.author, 100)
            .finish()
    }
}

impl Record for Devotional {
    const KIND: &'static str = "devotional";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Devotional {
    type Input = DevotionalInput;

    fn create(id: String, input: DevotionalInput, now: DateTime<Utc>) -> Self {
        let mut devotional = Self {
            id,
            title: String::new(),
            content: String::new(),
            verse_text: String::new(),
            verse_reference: String::new(),
            publish_date: input.publish_date,
            author: String::new(),
            is_active: true,
            created_at: now,
        };
        devotional.apply(input);
        devotional
    }

    fn apply(&mut self, input: DevotionalInput) {
        self.title = input.title;
        self.content = input.content;
        self.verse_text = input.verse_text;
        self.verse_reference = input.verse_reference;
        self.publish_date = input.publish_date;
        self.author = if input.author.trim().is_empty() {
            "Daily Grace".to_string()
        } else {
            input.author
        };
        self.is_active = input.is_active;
    }
}

// -- Verses --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub id: String,
    pub text: String,
    pub reference: String,
    pub theme: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct VerseInput {
    pub text: String,
    pub reference: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for VerseInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("text", &self.text)
            .required("reference", &self.reference)
            .max_len("reference", &self.reference, 100);
        if let Some(theme) = &self.theme {
            checks.max_len("theme", theme, 40);
        }
        checks.finish()
    }
}

impl Record for Verse {
    const KIND: &'static str = "verse";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Verse {
    type Input = VerseInput;

    fn create(id: String, input: VerseInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: input.text,
            reference: input.reference,
            theme: input.theme.map(|t| t.to_lowercase()),
            is_active: input.is_active,
            created_at: now,
        }
    }

    fn apply(&mut self, input: VerseInput) {
        self.text = input.text;
        self.reference = input.reference;
        self.theme = input.theme.map(|t| t.to_lowercase());
        self.is_active = input.is_active;
    }
}

// -- Prayers --

pub const PRAYER_CATEGORIES: &[&str] = &[
    "general", "health", "family", "work", "faith", "relationships", "grief", "gratitude",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prayer {
    pub id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub content: String,
    pub category: String,
    pub is_anonymous: bool,
    pub is_answered: bool,
    pub prayer_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PrayerInput {
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_answered: bool,
}

impl Validate for PrayerInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("content", &self.content)
            .max_len("content", &self.content, 2000)
            .one_of("category", &self.category, PRAYER_CATEGORIES);
        if let Some(name) = &self.name {
            checks.max_len("name", name, 100);
        }
        checks.finish()
    }
}

impl Record for Prayer {
    const KIND: &'static str = "prayer";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Prayer {
    type Input = PrayerInput;

    fn create(id: String, input: PrayerInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: None,
            name: input.name,
            content: input.content,
            category: input.category,
            is_anonymous: input.is_anonymous,
            is_answered: input.is_answered,
            prayer_count: 0,
            created_at: now,
        }
    }

    fn apply(&mut self, input: PrayerInput) {
        self.name = input.name;
        self.content = input.content;
        self.category = input.category;
        self.is_anonymous = input.is_anonymous;
        self.is_answered = input.is_answered;
    }
}

impl Prayer {
    /// Public view: anonymous prayers do not reveal who asked.
    pub fn redacted(mut self) -> Self {
        if self.is_anonymous {
            self.name = None;
            self.user_id = None;
        }
        self
    }
}

// -- Challenges --

pub const CHALLENGE_LENGTHS: &[i64] = &[7, 21];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    pub points_per_day: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeInput {
    pub title: String,
    pub description: String,
    pub duration_days: i64,
    #[serde(default = "default_points_per_day")]
    pub points_per_day: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_points_per_day() -> i64 {
    10
}

impl Validate for ChallengeInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("title", &self.title)
            .max_len("title", &self.title, 200)
            .required("description", &self.description)
            .check(
                "duration_days",
                CHALLENGE_LENGTHS.contains(&self.duration_days),
                "duration_days must be 7 or 21",
            )
            .range("points_per_day", self.points_per_day, 0, 1000)
            .finish()
    }
}

impl Record for Challenge {
    const KIND: &'static str = "challenge";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Challenge {
    type Input = ChallengeInput;

    fn create(id: String, input: ChallengeInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            duration_days: input.duration_days,
            points_per_day: input.points_per_day,
            is_active: input.is_active,
            created_at: now,
        }
    }

    fn apply(&mut self, input: ChallengeInput) {
        self.title = input.title;
        self.description = input.description;
        self.duration_days = input.duration_days;
        self.points_per_day = input.points_per_day;
        self.is_active = input.is_active;
    }
}

impl Challenge {
    /// Bonus awarded once the final day is completed.
    pub fn completion_bonus(&self) -> i64 {
        self.points_per_day * self.duration_days / 2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeDay {
    pub id: String,
    pub challenge_id: String,
    pub day_number: i64,
    pub title: String,
    pub reading: String,
    pub verse_reference: String,
    pub reflection: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeDayInput {
    pub challenge_id: String,
    pub day_number: i64,
    pub title: String,
    pub reading: String,
    pub verse_reference: String,
    #[serde(default)]
    pub reflection: String,
}

impl Validate for ChallengeDayInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("challenge_id", &self.challenge_id)
            .range("day_number", self.day_number, 1, 21)
            .required("title", &self.title)
            .required("reading", &self.reading)
            .required("verse_reference", &self.verse_reference)
            .finish()
    }
}

impl Record for ChallengeDay {
    const KIND: &'static str = "challenge day";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for ChallengeDay {
    type Input = ChallengeDayInput;

    fn create(id: String, input: ChallengeDayInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            challenge_id: input.challenge_id,
            day_number: input.day_number,
            title: input.title,
            reading: input.reading,
            verse_reference: input.verse_reference,
            reflection: input.reflection,
            created_at: now,
        }
    }

    fn apply(&mut self, input: ChallengeDayInput) {
        self.challenge_id = input.challenge_id;
        self.day_number = input.day_number;
        self.title = input.title;
        self.reading = input.reading;
        self.verse_reference = input.verse_reference;
        self.reflection = input.reflection;
    }
}

/// One completed day of a challenge for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub id: String,
    pub user_id: String,
    pub challenge_id: String,
    pub day_number: i64,
    pub completed_at: DateTime<Utc>,
}

impl Record for ChallengeProgress {
    const KIND: &'static str = "challenge progress";
    fn id(&self) -> &str {
        &self.id
    }
}

// -- Contributors & sponsors --

pub const CONTRIBUTION_TYPES: &[&str] = &["donor", "volunteer", "partner", "prayer_partner"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub contribution_type: String,
    pub amount_cents: Option<i64>,
    pub message: Option<String>,
    pub is_public: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ContributorInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_contribution_type")]
    pub contribution_type: String,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_contribution_type() -> String {
    "donor".to_string()
}

impl Validate for ContributorInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("name", &self.name)
            .max_len("name", &self.name, 120)
            .one_of("contribution_type", &self.contribution_type, CONTRIBUTION_TYPES);
        if let Some(email) = &self.email {
            checks.email("email", email);
        }
        if let Some(amount) = self.amount_cents {
            checks.range("amount_cents", amount, 0, 100_000_000);
        }
        if let Some(message) = &self.message {
            checks.max_len("message", message, 1000);
        }
        checks.finish()
    }
}

impl Record for Contributor {
    const KIND: &'static str = "contributor";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Contributor {
    type Input = ContributorInput;

    fn create(id: String, input: ContributorInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            contribution_type: input.contribution_type,
            amount_cents: input.amount_cents,
            message: input.message,
            is_public: input.is_public,
            is_active: input.is_active,
            created_at: now,
        }
    }

    fn apply(&mut self, input: ContributorInput) {
        self.name = input.name;
        self.email = input.email;
        self.contribution_type = input.contribution_type;
        self.amount_cents = input.amount_cents;
        self.message = input.message;
        self.is_public = input.is_public;
        self.is_active = input.is_active;
    }
}

pub const SPONSOR_TIERS: &[&str] = &["bronze", "silver", "gold", "platinum"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub tier: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SponsorInput {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_tier() -> String {
    "bronze".to_string()
}

impl Validate for SponsorInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 120)
            .url("website", self.website.as_deref())
            .url("logo_url", self.logo_url.as_deref())
            .one_of("tier", &self.tier, SPONSOR_TIERS)
            .finish()
    }
}

impl Record for Sponsor {
    const KIND: &'static str = "sponsor";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Sponsor {
    type Input = SponsorInput;

    fn create(id: String, input: SponsorInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            website: input.website,
            logo_url: input.logo_url,
            tier: input.tier,
            description: input.description,
            is_active: input.is_active,
            created_at: now,
        }
    }

    fn apply(&mut self, input: SponsorInput) {
        self.name = input.name;
        self.website = input.website;
        self.logo_url = input.logo_url;
        self.tier = input.tier;
        self.description = input.description;
        self.is_active = input.is_active;
    }
}

// -- Library --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ebook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub download_url: String,
    pub category: String,
    pub is_free: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EbookInput {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    pub download_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_free: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for EbookInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("title", &self.title)
            .required("author", &self.author)
            .required("download_url", &self.download_url)
            .url("download_url", Some(&self.download_url))
            .url("cover_url", self.cover_url.as_deref())
            .max_len("category", &self.category, 40)
            .finish()
    }
}

impl Record for Ebook {
    const KIND: &'static str = "ebook";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Ebook {
    type Input = EbookInput;

    fn create(id: String, input: EbookInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            author: input.author,
            description: input.description,
            cover_url: input.cover_url,
            download_url: input.download_url,
            category: input.category,
            is_free: input.is_free,
            is_active: input.is_active,
            created_at: now,
        }
    }

    fn apply(&mut self, input: EbookInput) {
        self.title = input.title;
        self.author = input.author;
        self.description = input.description;
        self.cover_url = input.cover_url;
        self.download_url = input.download_url;
        self.category = input.category;
        self.is_free = input.is_free;
        self.is_active = input.is_active;
    }
}

// -- Notifications --

pub const NOTIFICATION_KINDS: &[&str] = &["info", "devotional", "challenge", "prayer", "event"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// `None` is a broadcast to every user.
    pub user_id: Option<String>,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationInput {
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub is_read: bool,
}

fn default_kind() -> String {
    "info".to_string()
}

impl Validate for NotificationInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("title", &self.title)
            .max_len("title", &self.title, 120)
            .required("message", &self.message)
            .one_of("kind", &self.kind, NOTIFICATION_KINDS)
            .finish()
    }
}

impl Record for Notification {
    const KIND: &'static str = "notification";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Notification {
    type Input = NotificationInput;

    fn create(id: String, input: NotificationInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: input.user_id,
            title: input.title,
            message: input.message,
            kind: input.kind,
            is_read: input.is_read,
            created_at: now,
        }
    }

    fn apply(&mut self, input: NotificationInput) {
        self.user_id = input.user_id;
        self.title = input.title;
        self.message = input.message;
        self.kind = input.kind;
        self.is_read = input.is_read;
    }
}

// -- Certificates --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub contributor_id: String,
    pub template: String,
    pub verse_text: String,
    pub verse_reference: String,
    pub prayer: String,
    pub body: String,
    pub verification_code: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Certificate {
    const KIND: &'static str = "certificate";
    fn id(&self) -> &str {
        &self.id
    }
}

// -- Support network --

pub const SUPPORT_TOPICS: &[&str] = &["prayer", "counsel", "grief", "addiction", "family", "other"];
pub const SUPPORT_STATUSES: &[&str] = &["open", "answered", "closed"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequest {
    pub id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub topic: String,
    pub message: String,
    pub status: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SupportRequestInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub message: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

fn default_topic() -> String {
    "other".to_string()
}

fn default_status() -> String {
    "open".to_string()
}

impl Validate for SupportRequestInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .one_of("topic", &self.topic, SUPPORT_TOPICS)
            .required("message", &self.message)
            .max_len("message", &self.message, 4000)
            .one_of("status", &self.status, SUPPORT_STATUSES)
            .finish()
    }
}

impl Record for SupportRequest {
    const KIND: &'static str = "support request";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for SupportRequest {
    type Input = SupportRequestInput;

    fn create(id: String, input: SupportRequestInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: None,
            name: input.name,
            topic: input.topic,
            message: input.message,
            status: input.status,
            is_anonymous: input.is_anonymous,
            created_at: now,
        }
    }

    fn apply(&mut self, input: SupportRequestInput) {
        self.name = input.name;
        self.topic = input.topic;
        self.message = input.message;
        self.status = input.status;
        self.is_anonymous = input.is_anonymous;
    }
}

impl SupportRequest {
    pub fn redacted(mut self) -> Self {
        if self.is_anonymous {
            self.name = None;
            self.user_id = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportReply {
    pub id: String,
    pub request_id: String,
    pub user_id: Option<String>,
    pub author_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Record for SupportReply {
    const KIND: &'static str = "support reply";
    fn id(&self) -> &str {
        &self.id
    }
}

// -- Points ledger --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsEntry {
    pub id: String,
    pub user_id: String,
    pub points: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Record for PointsEntry {
    const KIND: &'static str = "points entry";
    fn id(&self) -> &str {
        &self.id
    }
}
