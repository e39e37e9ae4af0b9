use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::auth::hash_password;
use crate::domain::user::User;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn register(&self, apelido: String, email: String, password: String) -> Result<User> {
        let password_hash = hash_password(&password)?;
        let row = sqlx::query(
            "INSERT INTO users (apelido, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING id, apelido, email",
        )
        .bind(apelido)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.db.pool())
        .await?;

        Ok(user_from_row(&row))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, apelido, email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT id, apelido, email FROM users ORDER BY apelido, id")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        apelido: row.get("apelido"),
        email: row.get("email"),
    }
}
