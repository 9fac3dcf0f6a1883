use crate::models::{PostRow, PostWithVotesRow, UserRow};
use crate::Database;
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Outcome of applying a vote direction to a (post, user) pair. The caller
/// maps these onto HTTP statuses; the store only reports what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    Added,
    AlreadyVoted,
    Removed,
    NotVoted,
    PostMissing,
}

/// Outcome of an owner-gated post update.
#[derive(Debug)]
pub enum PostUpdate {
    Updated(PostRow),
    Missing,
    NotOwner,
}

/// Outcome of an owner-gated post delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostDelete {
    Deleted,
    Missing,
    NotOwner,
}

const POST_WITH_VOTES_COLS: &str = "
    p.id, p.title, p.content, p.published, p.created_at, p.owner_id,
    u.id, u.email, u.password, u.created_at, u.phone_number,
    COUNT(v.post_id) AS votes";

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRow> {
        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO users (email, password) VALUES (?1, ?2)",
                params![email, password_hash],
            )?;
            let id = tx.last_insert_rowid();
            query_user_by_id(tx, id)?.ok_or_else(|| anyhow!("user {} vanished after insert", id))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Posts --

    pub fn create_post(
        &self,
        owner_id: i64,
        title: &str,
        content: &str,
        published: bool,
    ) -> Result<PostRow> {
        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO posts (title, content, published, owner_id) VALUES (?1, ?2, ?3, ?4)",
                params![title, content, published, owner_id],
            )?;
            let id = tx.last_insert_rowid();
            query_post(tx, id)?.ok_or_else(|| anyhow!("post {} vanished after insert", id))
        })
    }

    /// Posts whose title contains `search` (case-sensitive; "" matches all),
    /// each joined with its owner and upvote count. No explicit ORDER BY —
    /// grouping by id yields the store's natural id order.
    pub fn list_posts(&self, search: &str, limit: i64, skip: i64) -> Result<Vec<PostWithVotesRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_WITH_VOTES_COLS}
                 FROM posts p
                 JOIN users u ON u.id = p.owner_id
                 LEFT JOIN votes v ON v.post_id = p.id
                 WHERE (?1 = '' OR instr(p.title, ?1) > 0)
                 GROUP BY p.id
                 LIMIT ?2 OFFSET ?3"
            ))?;

            let rows = stmt
                .query_map(params![search, limit, skip], map_post_with_votes)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_post_with_votes(&self, id: i64) -> Result<Option<PostWithVotesRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_WITH_VOTES_COLS}
                 FROM posts p
                 JOIN users u ON u.id = p.owner_id
                 LEFT JOIN votes v ON v.post_id = p.id
                 WHERE p.id = ?1
                 GROUP BY p.id"
            ))?;

            let row = stmt.query_row([id], map_post_with_votes).optional()?;
            Ok(row)
        })
    }

    /// Full replace of title/content/published, owner only. Existence is
    /// checked before ownership so a missing post never reports NotOwner.
    pub fn update_post(
        &self,
        id: i64,
        caller_id: i64,
        title: &str,
        content: &str,
        published: bool,
    ) -> Result<PostUpdate> {
        self.with_tx(|tx| {
            let existing = match query_post(tx, id)? {
                Some(post) => post,
                None => return Ok(PostUpdate::Missing),
            };
            if existing.owner_id != caller_id {
                return Ok(PostUpdate::NotOwner);
            }

            tx.execute(
                "UPDATE posts SET title = ?2, content = ?3, published = ?4 WHERE id = ?1",
                params![id, title, content, published],
            )?;

            let updated =
                query_post(tx, id)?.ok_or_else(|| anyhow!("post {} vanished during update", id))?;
            Ok(PostUpdate::Updated(updated))
        })
    }

    /// Owner-only delete; votes on the post go with it via the cascade.
    pub fn delete_post(&self, id: i64, caller_id: i64) -> Result<PostDelete> {
        self.with_tx(|tx| {
            let existing = match query_post(tx, id)? {
                Some(post) => post,
                None => return Ok(PostDelete::Missing),
            };
            if existing.owner_id != caller_id {
                return Ok(PostDelete::NotOwner);
            }

            tx.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(PostDelete::Deleted)
        })
    }

    // -- Votes --

    /// Two-state toggle per (post, user): `up` inserts, `!up` deletes.
    /// Check-then-act runs inside one transaction so the pair cannot change
    /// between the existence checks and the write.
    pub fn apply_vote(&self, post_id: i64, user_id: i64, up: bool) -> Result<VoteChange> {
        self.with_tx(|tx| {
            let post_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)",
                [post_id],
                |row| row.get(0),
            )?;
            if !post_exists {
                return Ok(VoteChange::PostMissing);
            }

            let voted: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM votes WHERE post_id = ?1 AND user_id = ?2)",
                params![post_id, user_id],
                |row| row.get(0),
            )?;

            if up {
                if voted {
                    return Ok(VoteChange::AlreadyVoted);
                }
                tx.execute(
                    "INSERT INTO votes (post_id, user_id) VALUES (?1, ?2)",
                    params![post_id, user_id],
                )?;
                Ok(VoteChange::Added)
            } else {
                if !voted {
                    return Ok(VoteChange::NotVoted);
                }
                tx.execute(
                    "DELETE FROM votes WHERE post_id = ?1 AND user_id = ?2",
                    params![post_id, user_id],
                )?;
                Ok(VoteChange::Removed)
            }
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, password, created_at, phone_number FROM users WHERE email = ?1",
    )?;

    let row = stmt.query_row([email], map_user).optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, password, created_at, phone_number FROM users WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_user).optional()?;
    Ok(row)
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, published, created_at, owner_id FROM posts WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_post).optional()?;
    Ok(row)
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
        phone_number: row.get(4)?,
    })
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        published: row.get(3)?,
        created_at: row.get(4)?,
        owner_id: row.get(5)?,
    })
}

fn map_post_with_votes(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostWithVotesRow> {
    Ok(PostWithVotesRow {
        post: PostRow {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            published: row.get(3)?,
            created_at: row.get(4)?,
            owner_id: row.get(5)?,
        },
        owner: UserRow {
            id: row.get(6)?,
            email: row.get(7)?,
            password: row.get(8)?,
            created_at: row.get(9)?,
            phone_number: row.get(10)?,
        },
        votes: row.get(11)?,
    })
}
