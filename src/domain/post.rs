use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Always equal to the number of `like` reactions on this post.
    #[serde(rename = "numeroLikes")]
    pub numero_likes: i32,
    /// Always equal to the number of `deslike` reactions on this post.
    #[serde(rename = "numeroDeslikes")]
    pub numero_deslikes: i32,
}
