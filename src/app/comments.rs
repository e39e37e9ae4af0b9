use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct CommentService {
    db: Db,
}

impl CommentService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn add_comment(&self, post_id: Uuid, user_id: Uuid, content: String) -> Result<Comment> {
        let row = sqlx::query(
            "INSERT INTO comments (user_id, post_id, content) VALUES ($1, $2, $3) \
             RETURNING id, user_id, post_id, content, created_at",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(self.db.pool())
        .await?;

        Ok(comment_from_row(&row))
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, user_id, post_id, content, created_at \
             FROM comments \
             WHERE post_id = $1 \
             ORDER BY created_at, id",
        )
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        post_id: row.get("post_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}
