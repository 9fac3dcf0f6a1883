/// Database row types — these map directly to SQLite rows.
/// Distinct from quill-types API models to keep the DB layer independent;
/// timestamps stay as the TEXT the store hands back and are parsed at the
/// API edge.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created_at: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: String,
    pub owner_id: i64,
}

/// Joined read shape for the post endpoints: the post, its owner, and the
/// upvote count, fetched in one query.
#[derive(Debug)]
pub struct PostWithVotesRow {
    pub post: PostRow,
    pub owner: UserRow,
    pub votes: i64,
}
