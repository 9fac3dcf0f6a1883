use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Ordered migration chain. `PRAGMA user_version` records the last applied
/// step; each pending step runs once inside its own transaction.
///
/// The chain grew column by column, so two steps rebuild the posts table:
/// SQLite's ALTER TABLE cannot add a NOT NULL foreign key (step 4) or a
/// column with a non-constant default (step 5).
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create posts table",
        "
        CREATE TABLE posts (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            title  TEXT NOT NULL
        );
        ",
    ),
    (
        "add content column to posts",
        "
        ALTER TABLE posts ADD COLUMN content TEXT NOT NULL DEFAULT '';
        ",
    ),
    (
        "add users table",
        "
        CREATE TABLE users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            email         TEXT NOT NULL UNIQUE,
            password      TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            phone_number  TEXT
        );
        ",
    ),
    (
        "add owner_id foreign key to posts",
        "
        CREATE TABLE posts_new (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            title     TEXT NOT NULL,
            content   TEXT NOT NULL DEFAULT '',
            owner_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        );
        INSERT INTO posts_new (id, title, content, owner_id)
            SELECT id, title, content, 0 FROM posts;
        DROP TABLE posts;
        ALTER TABLE posts_new RENAME TO posts;
        CREATE INDEX idx_posts_owner ON posts(owner_id);
        ",
    ),
    (
        "add created_at and published to posts",
        "
        CREATE TABLE posts_new (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            title      TEXT NOT NULL,
            content    TEXT NOT NULL DEFAULT '',
            published  INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            owner_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        );
        INSERT INTO posts_new (id, title, content, owner_id)
            SELECT id, title, content, owner_id FROM posts;
        DROP TABLE posts;
        ALTER TABLE posts_new RENAME TO posts;
        CREATE INDEX idx_posts_owner ON posts(owner_id);
        ",
    ),
    (
        "create votes table",
        "
        CREATE TABLE votes (
            post_id  INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, user_id)
        );
        CREATE INDEX idx_votes_user ON votes(user_id);
        ",
    ),
];

pub fn run(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, (name, sql)) in MIGRATIONS.iter().copied().enumerate() {
        let version = (idx as i64) + 1;
        if version <= current {
            continue;
        }

        conn.execute_batch(&format!(
            "BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;"
        ))?;
        info!(version, name, "Applied migration");
    }

    Ok(())
}
