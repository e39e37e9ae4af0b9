use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::post::Post;
use crate::infra::db::Db;

const POST_COLUMNS: &str =
    "id, title, content, user_id, created_at, numero_likes, numero_deslikes";

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// New posts always start with zeroed reaction counters.
    pub async fn create_post(&self, user_id: Uuid, title: String, content: String) -> Result<Post> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (user_id, title, content) \
             VALUES ($1, $2, $3) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(self.db.pool())
        .await?;

        Ok(post_from_row(&row))
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    pub async fn exists(&self, post_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(self.db.pool())
                .await?;

        Ok(exists)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }
}

fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        numero_likes: row.get("numero_likes"),
        numero_deslikes: row.get("numero_deslikes"),
    }
}
