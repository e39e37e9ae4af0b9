use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::auth::AuthService;
use crate::app::comments::CommentService;
use crate::app::posts::PostService;
use crate::app::reactions::ReactionService;
use crate::app::users::UserService;
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::reaction::Outcome;
use crate::domain::user::User;
use crate::http::{AppError, AuthUser};
use crate::infra::db::{constraint_violation, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::AppState;

const MAX_PASSWORD_LEN: usize = 128;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Trimmed value of a required text field, or `None` when absent or blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A path id that is not a UUID cannot name an existing row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn is_violation(err: &anyhow::Error, code: &str) -> bool {
    constraint_violation(err).is_some_and(|(found, _)| found == code)
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (present(payload.email), payload.password) else {
        return Err(AppError::bad_request("email and password are required"));
    };
    if password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let service = AuthService::new(
        state.db.clone(),
        state.paseto_access_key,
        state.access_ttl_minutes,
    );
    let token = service.login(&email, &password).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to login");
        AppError::internal("failed to login")
    })?;

    match token {
        Some(token) => Ok(Json(LoginResponse {
            token: token.token,
            expires_at: token.expires_at,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

pub async fn get_current_user(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service.get_user(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to fetch current user");
        AppError::internal("failed to fetch current user")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let service = UserService::new(state.db.clone());
    let users = service.list_users().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list users");
        AppError::internal("failed to list users")
    })?;

    Ok(Json(users))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub apelido: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(payload) = payload?;
    let (Some(apelido), Some(email), Some(password)) = (
        present(payload.apelido),
        present(payload.email),
        payload.password.filter(|password| !password.is_empty()),
    ) else {
        return Err(AppError::bad_request("apelido, email and password are required"));
    };

    if apelido.chars().count() < 2 {
        return Err(AppError::bad_request("apelido must be at least 2 characters"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let service = UserService::new(state.db.clone());
    let user = service
        .register(apelido, email, password)
        .await
        .map_err(|err| {
            if let Some((code, constraint)) = constraint_violation(&err) {
                if code == UNIQUE_VIOLATION && constraint.contains("users_email_key") {
                    return AppError::conflict("email already taken");
                }
            }
            tracing::error!(error = ?err, "failed to create user");
            AppError::internal("failed to create user")
        })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let service = PostService::new(state.db.clone());
    let posts = service.list_posts().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list posts");
        AppError::internal("failed to list posts")
    })?;

    Ok(Json(posts))
}

pub async fn get_post(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let Some(post_id) = parse_id(&id) else {
        return Err(AppError::not_found("post not found"));
    };

    let service = PostService::new(state.db.clone());
    let post = service.get_post(post_id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %post_id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::not_found("post not found")),
    }
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<String>,
}

pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let Json(payload) = payload?;
    let (Some(title), Some(content)) = (present(payload.title), present(payload.content)) else {
        return Err(AppError::bad_request("title and content are required"));
    };
    let user_id = payload
        .user_id
        .as_deref()
        .and_then(parse_id)
        .ok_or_else(|| AppError::bad_request("user_id must be a valid id"))?;

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(user_id, title, content)
        .await
        .map_err(|err| {
            if is_violation(&err, FOREIGN_KEY_VIOLATION) {
                return AppError::bad_request("user_id does not reference an existing user");
            }
            tracing::error!(error = ?err, user_id = %user_id, "failed to create post");
            AppError::internal("failed to create post")
        })?;

    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequestBody {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Serialize)]
pub struct ReactionResponse {
    pub message: &'static str,
    #[serde(rename = "numeroLikes")]
    pub numero_likes: i32,
    #[serde(rename = "numeroDeslikes")]
    pub numero_deslikes: i32,
}

pub async fn react_to_post(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<ReactionRequestBody>, JsonRejection>,
) -> Result<Json<ReactionResponse>, AppError> {
    let Json(payload) = payload?;

    let service = ReactionService::new(state.db.clone());
    let outcome = service
        .react(&id, payload.user_id.as_deref(), payload.action.as_deref())
        .await
        .map_err(|err| {
            if is_violation(&err, FOREIGN_KEY_VIOLATION) {
                return AppError::bad_request("userId does not reference an existing user");
            }
            tracing::error!(error = ?err, post_id = %id, "failed to process reaction");
            AppError::internal("failed to process reaction")
        })?;

    match outcome {
        Outcome::Success {
            transition,
            numero_likes,
            numero_deslikes,
        } => Ok(Json(ReactionResponse {
            message: transition.message(),
            numero_likes,
            numero_deslikes,
        })),
        Outcome::Rejected(rejection) => Err(AppError::bad_request(rejection.message())),
        Outcome::NotFound => Err(AppError::not_found("post not found")),
        Outcome::InvalidArgument(message) => Err(AppError::bad_request(message)),
    }
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub user_id: Option<String>,
    pub content: Option<String>,
}

pub async fn comment_post(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let Some(post_id) = parse_id(&id) else {
        return Err(AppError::not_found("post not found"));
    };

    let exists = PostService::new(state.db.clone())
        .exists(post_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = %post_id, "failed to fetch post");
            AppError::internal("failed to comment")
        })?;
    if !exists {
        return Err(AppError::not_found("post not found"));
    }

    let Json(payload) = payload?;
    let (Some(user_id), Some(content)) = (present(payload.user_id), present(payload.content))
    else {
        return Err(AppError::bad_request("user_id and content are required"));
    };
    let user_id =
        parse_id(&user_id).ok_or_else(|| AppError::bad_request("user_id must be a valid id"))?;

    let service = CommentService::new(state.db.clone());
    let comment = service
        .add_comment(post_id, user_id, content)
        .await
        .map_err(|err| {
            if is_violation(&err, FOREIGN_KEY_VIOLATION) {
                return AppError::bad_request("user_id does not reference an existing user");
            }
            tracing::error!(error = ?err, user_id = %user_id, post_id = %post_id, "failed to comment");
            AppError::internal("failed to comment")
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_post_comments(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let Some(post_id) = parse_id(&id) else {
        return Ok(Json(Vec::new()));
    };

    let service = CommentService::new(state.db.clone());
    let comments = service.list_comments(post_id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %post_id, "failed to list comments");
        AppError::internal("failed to list comments")
    })?;

    Ok(Json(comments))
}
