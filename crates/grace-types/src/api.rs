use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Certificate, Challenge, ChallengeDay, PointsEntry, SupportReply, SupportRequest, User};
use crate::validate::{Checks, FieldError, Validate};

// -- JWT Claims --

/// JWT claims issued at login and checked by the REST middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .email("email", self.email.trim())
            .max_len("email", &self.email, 254)
            .min_len("password", &self.password, 8)
            .max_len("password", &self.password, 128)
            .max_len("display_name", &self.display_name, 60)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

/// A user as other clients may see it. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

// -- Verses --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerseSource {
    BibleApi,
    LabsBible,
    Static,
}

/// A verse as returned by the daily/random endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureVerse {
    pub text: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub source: VerseSource,
}

#[derive(Debug, Deserialize)]
pub struct RandomVerseQuery {
    pub theme: Option<String>,
}

// -- Prayers --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PrayerStats {
    pub total: usize,
    pub answered: usize,
    pub prayers_offered: i64,
    pub by_category: BTreeMap<String, usize>,
}

// -- Challenges --

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeDetail {
    pub challenge: Challenge,
    pub days: Vec<ChallengeDay>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeProgressView {
    pub challenge_id: String,
    pub completed_days: Vec<i64>,
    /// Next day that may be completed; `None` once the challenge is finished.
    pub next_day: Option<i64>,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteDayResponse {
    pub day_number: i64,
    pub already_completed: bool,
    pub points_awarded: i64,
    pub progress: ChallengeProgressView,
}

// -- Points --

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsSummary {
    pub balance: i64,
    pub entries: Vec<PointsEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub points: i64,
}

// -- Support network --

#[derive(Debug, Serialize, Deserialize)]
pub struct SupportThread {
    pub request: SupportRequest,
    pub replies: Vec<SupportReply>,
}

#[derive(Debug, Deserialize)]
pub struct SupportReplyRequest {
    #[serde(default)]
    pub author_name: Option<String>,
    pub message: String,
}

impl Validate for SupportReplyRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("message", &self.message)
            .max_len("message", &self.message, 4000);
        if let Some(name) = &self.author_name {
            checks.max_len("author_name", name, 100);
        }
        checks.finish()
    }
}

// -- Guidance --

#[derive(Debug, Deserialize)]
pub struct GuidanceRequest {
    pub message: String,
}

impl Validate for GuidanceRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new()
            .required("message", &self.message)
            .max_len("message", &self.message, 2000)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceSource {
    Model,
    Template,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuidanceResponse {
    pub emotion: String,
    pub response: String,
    pub verse: ScriptureVerse,
    pub source: GuidanceSource,
}

// -- Certificates --

#[derive(Debug, Deserialize)]
pub struct CertificateRequest {
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_template() -> String {
    "gratitude".to_string()
}

impl Validate for CertificateRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checks::new().required("template", &self.template).finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CertificateVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,
}

// -- Admin --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminStats {
    pub users: usize,
    pub devotionals: usize,
    pub verses: usize,
    pub prayers: usize,
    pub challenges: usize,
    pub contributors: usize,
    pub ebooks: usize,
    pub sponsors: usize,
    pub certificates: usize,
    pub support_requests: usize,
}
