use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::reaction::{decide, Outcome, ReactionKind, ReactionRequest, Transition};
use crate::infra::db::Db;

/// Storage primitives the reaction engine needs for one unit of work.
///
/// Every call made during a single [`apply`] is expected to run inside the
/// same transaction, with `lock_post` holding the post row until it ends.
#[async_trait]
pub trait ReactionStore: Send {
    /// Locks the post row. Returns `false` when the post does not exist.
    async fn lock_post(&mut self, post_id: Uuid) -> Result<bool>;

    async fn find_reaction(&mut self, post_id: Uuid, user_id: Uuid)
        -> Result<Option<ReactionKind>>;

    async fn insert_reaction(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<()>;

    async fn set_reaction_kind(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<()>;

    async fn delete_reaction(&mut self, post_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Adds the deltas to the post counters and returns the new `(likes, deslikes)`.
    async fn adjust_counters(
        &mut self,
        post_id: Uuid,
        likes_delta: i32,
        deslikes_delta: i32,
    ) -> Result<(i32, i32)>;
}

pub async fn apply<S>(store: &mut S, post_id: Uuid, request: ReactionRequest) -> Result<Outcome>
where
    S: ReactionStore + ?Sized,
{
    if !store.lock_post(post_id).await? {
        return Ok(Outcome::NotFound);
    }

    let existing = store.find_reaction(post_id, request.user_id).await?;
    let transition = match decide(existing, request.action) {
        Ok(transition) => transition,
        Err(rejection) => return Ok(Outcome::Rejected(rejection)),
    };

    match transition {
        Transition::Create(kind) => {
            store
                .insert_reaction(post_id, request.user_id, kind)
                .await?
        }
        Transition::Flip(kind) => {
            store
                .set_reaction_kind(post_id, request.user_id, kind)
                .await?
        }
        Transition::Remove(_) => store.delete_reaction(post_id, request.user_id).await?,
    }

    let (likes_delta, deslikes_delta) = transition.counter_delta();
    let (numero_likes, numero_deslikes) = store
        .adjust_counters(post_id, likes_delta, deslikes_delta)
        .await?;

    Ok(Outcome::Success {
        transition,
        numero_likes,
        numero_deslikes,
    })
}

pub struct PgReactionStore<'c> {
    tx: Transaction<'c, Postgres>,
}

impl<'c> PgReactionStore<'c> {
    pub fn new(tx: Transaction<'c, Postgres>) -> Self {
        Self { tx }
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore<'_> {
    async fn lock_post(&mut self, post_id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.is_some())
    }

    async fn find_reaction(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReactionKind>> {
        let row = sqlx::query(
            "SELECT type FROM reactions WHERE user_id = $1 AND post_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        match row {
            Some(row) => {
                let kind: String = row.get("type");
                let kind = ReactionKind::from_db(&kind)
                    .ok_or_else(|| anyhow!("unknown reaction type: {}", kind))?;
                Ok(Some(kind))
            }
            None => Ok(None),
        }
    }

    async fn insert_reaction(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<()> {
        sqlx::query("INSERT INTO reactions (user_id, post_id, type) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(post_id)
            .bind(kind.as_db())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn set_reaction_kind(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<()> {
        let result =
            sqlx::query("UPDATE reactions SET type = $3 WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .bind(kind.as_db())
                .execute(&mut *self.tx)
                .await?;

        if result.rows_affected() != 1 {
            return Err(anyhow!("reaction row missing during update"));
        }
        Ok(())
    }

    async fn delete_reaction(&mut self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reactions WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() != 1 {
            return Err(anyhow!("reaction row missing during delete"));
        }
        Ok(())
    }

    async fn adjust_counters(
        &mut self,
        post_id: Uuid,
        likes_delta: i32,
        deslikes_delta: i32,
    ) -> Result<(i32, i32)> {
        let row = sqlx::query(
            "UPDATE posts \
             SET numero_likes = numero_likes + $2, \
                 numero_deslikes = numero_deslikes + $3 \
             WHERE id = $1 \
             RETURNING numero_likes, numero_deslikes",
        )
        .bind(post_id)
        .bind(likes_delta)
        .bind(deslikes_delta)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok((row.get("numero_likes"), row.get("numero_deslikes")))
    }
}

#[derive(Clone)]
pub struct ReactionService {
    db: Db,
}

impl ReactionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn react(
        &self,
        post_id: &str,
        user_id: Option<&str>,
        action: Option<&str>,
    ) -> Result<Outcome> {
        let request = match ReactionRequest::parse(user_id, action) {
            Ok(request) => request,
            Err(message) => return Ok(Outcome::InvalidArgument(message)),
        };
        let Ok(post_id) = Uuid::parse_str(post_id) else {
            return Ok(Outcome::NotFound);
        };

        let tx = self.db.pool().begin().await?;
        let mut store = PgReactionStore::new(tx);
        let outcome = apply(&mut store, post_id, request).await?;

        match &outcome {
            Outcome::Success { transition, .. } => {
                store.commit().await?;
                tracing::info!(
                    post_id = %post_id,
                    user_id = %request.user_id,
                    transition = ?transition,
                    reaction = transition.resulting_kind().map_or("none", |kind| kind.as_db()),
                    "reaction applied"
                );
            }
            _ => store.rollback().await?,
        }

        Ok(outcome)
    }
}
