use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              TEXT PRIMARY KEY,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                display_name    TEXT NOT NULL,
                is_admin        INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE devotionals (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                content         TEXT NOT NULL,
                verse_text      TEXT NOT NULL,
                verse_reference TEXT NOT NULL,
                publish_date    TEXT NOT NULL,
                author          TEXT NOT NULL,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_devotionals_date ON devotionals(publish_date);

            CREATE TABLE verses (
                id          TEXT PRIMARY KEY,
                text        TEXT NOT NULL,
                reference   TEXT NOT NULL,
                theme       TEXT,
                is_active   INTEGER NOT NULL DEFAULT 1,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE prayers (
                id              TEXT PRIMARY KEY,
                user_id         TEXT,
                name            TEXT,
                content         TEXT NOT NULL,
                category        TEXT NOT NULL DEFAULT 'general',
                is_anonymous    INTEGER NOT NULL DEFAULT 0,
                is_answered     INTEGER NOT NULL DEFAULT 0,
                prayer_count    INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE challenges (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                duration_days   INTEGER NOT NULL,
                points_per_day  INTEGER NOT NULL DEFAULT 10,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE challenge_days (
                id              TEXT PRIMARY KEY,
                challenge_id    TEXT NOT NULL,
                day_number      INTEGER NOT NULL,
                title           TEXT NOT NULL,
                reading         TEXT NOT NULL,
                verse_reference TEXT NOT NULL,
                reflection      TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_challenge_days_challenge ON challenge_days(challenge_id);

            CREATE TABLE challenge_progress (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                challenge_id    TEXT NOT NULL,
                day_number      INTEGER NOT NULL,
                completed_at    TEXT NOT NULL
            );

            CREATE INDEX idx_challenge_progress_user ON challenge_progress(user_id);

            CREATE TABLE contributors (
                id                  TEXT PRIMARY KEY,
                name                TEXT NOT NULL,
                email               TEXT,
                contribution_type   TEXT NOT NULL,
                amount_cents        INTEGER,
                message             TEXT,
                is_public           INTEGER NOT NULL DEFAULT 1,
                is_active           INTEGER NOT NULL DEFAULT 1,
                created_at          TEXT NOT NULL
            );

            CREATE TABLE ebooks (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                author          TEXT NOT NULL,
                description     TEXT NOT NULL,
                cover_url       TEXT,
                download_url    TEXT NOT NULL,
                category        TEXT NOT NULL,
                is_free         INTEGER NOT NULL DEFAULT 1,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE sponsors (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                website     TEXT,
                logo_url    TEXT,
                tier        TEXT NOT NULL,
                description TEXT,
                is_active   INTEGER NOT NULL DEFAULT 1,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE notifications (
                id          TEXT PRIMARY KEY,
                user_id     TEXT,
                title       TEXT NOT NULL,
                message     TEXT NOT NULL,
                kind        TEXT NOT NULL,
                is_read     INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE certificates (
                id                  TEXT PRIMARY KEY,
                contributor_id      TEXT NOT NULL,
                template            TEXT NOT NULL,
                verse_text          TEXT NOT NULL,
                verse_reference     TEXT NOT NULL,
                prayer              TEXT NOT NULL,
                body                TEXT NOT NULL,
                verification_code   TEXT NOT NULL UNIQUE,
                created_at          TEXT NOT NULL
            );

            CREATE TABLE support_requests (
                id              TEXT PRIMARY KEY,
                user_id         TEXT,
                name            TEXT,
                topic           TEXT NOT NULL,
                message         TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'open',
                is_anonymous    INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE support_replies (
                id          TEXT PRIMARY KEY,
                request_id  TEXT NOT NULL,
                user_id     TEXT,
                author_name TEXT NOT NULL,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_support_replies_request ON support_replies(request_id);

            CREATE TABLE points_ledger (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                points      INTEGER NOT NULL,
                reason      TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_points_ledger_user ON points_ledger(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
