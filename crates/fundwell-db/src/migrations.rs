use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                picture     BLOB,
                role        TEXT NOT NULL CHECK (role IN
                                ('donor', 'campaign_creator', 'administrator', 'root_administrator')),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE campaign_creator_requests (
                id                      INTEGER PRIMARY KEY AUTOINCREMENT,
                identification_document BLOB NOT NULL,
                status                  TEXT NOT NULL DEFAULT 'Pending'
                                            CHECK (status IN ('Pending', 'Approved', 'Rejected')),
                campaign_creator_id     INTEGER NOT NULL UNIQUE
                                            REFERENCES users(id) ON DELETE CASCADE,
                created_at              TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE campaign_requests (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                status      TEXT NOT NULL DEFAULT 'Pending'
                                CHECK (status IN ('Pending', 'Approved', 'Rejected')),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE campaigns (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                title               TEXT NOT NULL,
                description         TEXT NOT NULL,
                media               BLOB,
                goal_cents          INTEGER NOT NULL CHECK (goal_cents > 0),
                end_date            TEXT NOT NULL,
                iban                TEXT NOT NULL CHECK (length(iban) <= 34),
                creator_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                validator_id        INTEGER REFERENCES users(id) ON DELETE SET NULL,
                campaign_request_id INTEGER NOT NULL UNIQUE REFERENCES campaign_requests(id),
                created_at          TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_campaigns_creator ON campaigns(creator_id);

            CREATE TABLE donations (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                value_cents INTEGER NOT NULL CHECK (value_cents > 0),
                campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
                donor_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_donations_campaign ON donations(campaign_id, donor_id);

            CREATE TABLE campaign_updates (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                content     TEXT NOT NULL,
                media       BLOB,
                campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_campaign_updates_campaign ON campaign_updates(campaign_id, created_at);

            CREATE TABLE reports (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
                reporter_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
