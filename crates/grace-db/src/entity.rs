//! Table mapping for every domain record.

use grace_types::models::{
    Certificate, Challenge, ChallengeDay, ChallengeProgress, Contributor, Devotional, Ebook,
    Notification, PointsEntry, Prayer, Sponsor, SupportReply, SupportRequest, User, Verse,
};
use grace_types::models::Record;
use rusqlite::{Row, ToSql};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record with a table behind it. Column names double as JSON field names,
/// which is what lets the memory store filter on them.
pub trait Entity: Record + Serialize + DeserializeOwned {
    const TABLE: &'static str;

    /// Column names in row order. The first is always `id`.
    const COLUMNS: &'static [&'static str];

    /// Columns whose values must be unique across the table.
    const UNIQUE: &'static [&'static str] = &[];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Values in [`Entity::COLUMNS`] order.
    fn params(&self) -> Vec<&dyn ToSql>;
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] =
        &["id", "email", "password_hash", "display_name", "is_admin", "created_at"];
    const UNIQUE: &'static [&'static str] = &["email"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            display_name: row.get(3)?,
            is_admin: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.email,
            &self.password_hash,
            &self.display_name,
            &self.is_admin,
            &self.created_at,
        ]
    }
}

impl Entity for Devotional {
    const TABLE: &'static str = "devotionals";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "content",
        "verse_text",
        "verse_reference",
        "publish_date",
        "author",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            verse_text: row.get(3)?,
            verse_reference: row.get(4)?,
            publish_date: row.get(5)?,
            author: row.get(6)?,
            is_active: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.title,
            &self.content,
            &self.verse_text,
            &self.verse_reference,
            &self.publish_date,
            &self.author,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for Verse {
    const TABLE: &'static str = "verses";
    const COLUMNS: &'static [&'static str] =
        &["id", "text", "reference", "theme", "is_active", "created_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            reference: row.get(2)?,
            theme: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.text,
            &self.reference,
            &self.theme,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for Prayer {
    const TABLE: &'static str = "prayers";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "name",
        "content",
        "category",
        "is_anonymous",
        "is_answered",
        "prayer_count",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            content: row.get(3)?,
            category: row.get(4)?,
            is_anonymous: row.get(5)?,
            is_answered: row.get(6)?,
            prayer_count: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.user_id,
            &self.name,
            &self.content,
            &self.category,
            &self.is_anonymous,
            &self.is_answered,
            &self.prayer_count,
            &self.created_at,
        ]
    }
}

impl Entity for Challenge {
    const TABLE: &'static str = "challenges";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "duration_days",
        "points_per_day",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            duration_days: row.get(3)?,
            points_per_day: row.get(4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.title,
            &self.description,
            &self.duration_days,
            &self.points_per_day,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for ChallengeDay {
    const TABLE: &'static str = "challenge_days";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "challenge_id",
        "day_number",
        "title",
        "reading",
        "verse_reference",
        "reflection",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            challenge_id: row.get(1)?,
            day_number: row.get(2)?,
            title: row.get(3)?,
            reading: row.get(4)?,
            verse_reference: row.get(5)?,
            reflection: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.challenge_id,
            &self.day_number,
            &self.title,
            &self.reading,
            &self.verse_reference,
            &self.reflection,
            &self.created_at,
        ]
    }
}

impl Entity for ChallengeProgress {
    const TABLE: &'static str = "challenge_progress";
    const COLUMNS: &'static [&'static str] =
        &["id", "user_id", "challenge_id", "day_number", "completed_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            challenge_id: row.get(2)?,
            day_number: row.get(3)?,
            completed_at: row.get(4)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.user_id,
            &self.challenge_id,
            &self.day_number,
            &self.completed_at,
        ]
    }
}

impl Entity for Contributor {
    const TABLE: &'static str = "contributors";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "contribution_type",
        "amount_cents",
        "message",
        "is_public",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            contribution_type: row.get(3)?,
            amount_cents: row.get(4)?,
            message: row.get(5)?,
            is_public: row.get(6)?,
            is_active: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.name,
            &self.email,
            &self.contribution_type,
            &self.amount_cents,
            &self.message,
            &self.is_public,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for Ebook {
    const TABLE: &'static str = "ebooks";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "author",
        "description",
        "cover_url",
        "download_url",
        "category",
        "is_free",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            description: row.get(3)?,
            cover_url: row.get(4)?,
            download_url: row.get(5)?,
            category: row.get(6)?,
            is_free: row.get(7)?,
            is_active: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.title,
            &self.author,
            &self.description,
            &self.cover_url,
            &self.download_url,
            &self.category,
            &self.is_free,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for Sponsor {
    const TABLE: &'static str = "sponsors";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "website",
        "logo_url",
        "tier",
        "description",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            website: row.get(2)?,
            logo_url: row.get(3)?,
            tier: row.get(4)?,
            description: row.get(5)?,
            is_active: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.name,
            &self.website,
            &self.logo_url,
            &self.tier,
            &self.description,
            &self.is_active,
            &self.created_at,
        ]
    }
}

impl Entity for Notification {
    const TABLE: &'static str = "notifications";
    const COLUMNS: &'static [&'static str] =
        &["id", "user_id", "title", "message", "kind", "is_read", "created_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            message: row.get(3)?,
            kind: row.get(4)?,
            is_read: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.user_id,
            &self.title,
            &self.message,
            &self.kind,
            &self.is_read,
            &self.created_at,
        ]
    }
}

impl Entity for Certificate {
    const TABLE: &'static str = "certificates";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "contributor_id",
        "template",
        "verse_text",
        "verse_reference",
        "prayer",
        "body",
        "verification_code",
        "created_at",
    ];
    const UNIQUE: &'static [&'static str] = &["verification_code"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            contributor_id: row.get(1)?,
            template: row.get(2)?,
            verse_text: row.get(3)?,
            verse_reference: row.get(4)?,
            prayer: row.get(5)?,
            body: row.get(6)?,
            verification_code: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.contributor_id,
            &self.template,
            &self.verse_text,
            &self.verse_reference,
            &self.prayer,
            &self.body,
            &self.verification_code,
            &self.created_at,
        ]
    }
}

impl Entity for SupportRequest {
    const TABLE: &'static str = "support_requests";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "name",
        "topic",
        "message",
        "status",
        "is_anonymous",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            topic: row.get(3)?,
            message: row.get(4)?,
            status: row.get(5)?,
            is_anonymous: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.user_id,
            &self.name,
            &self.topic,
            &self.message,
            &self.status,
            &self.is_anonymous,
            &self.created_at,
        ]
    }
}

impl Entity for SupportReply {
    const TABLE: &'static str = "support_replies";
    const COLUMNS: &'static [&'static str] =
        &["id", "request_id", "user_id", "author_name", "message", "created_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            request_id: row.get(1)?,
            user_id: row.get(2)?,
            author_name: row.get(3)?,
            message: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.request_id,
            &self.user_id,
            &self.author_name,
            &self.message,
            &self.created_at,
        ]
    }
}

impl Entity for PointsEntry {
    const TABLE: &'static str = "points_ledger";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "points", "reason", "created_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            points: row.get(2)?,
            reason: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.id,
            &self.user_id,
            &self.points,
            &self.reason,
            &self.created_at,
        ]
    }
}
