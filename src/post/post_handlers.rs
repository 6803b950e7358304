use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::Result, middleware::AuthUser, state::AppState};

use super::post_dto::{
    CommentRequest, CommentResponse, CreatePostRequest, FeedQuery, LikeResponse, PostResponse,
};

/// Get the global feed, newest-first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u32>, Query, description = "Posts per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Feed posts", body = Vec<PostResponse>)
    )
)]
pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse> {
    let posts = state
        .post_service
        .get_feed(query.page.unwrap_or(1), query.limit.unwrap_or(10))
        .await?;

    Ok((StatusCode::OK, Json(posts)))
}

/// Get a user's posts, newest-first
#[utoipa::path(
    get,
    path = "/api/posts/user/{user_id}",
    tag = "posts",
    params(
        ("user_id" = Uuid, Path, description = "Author user ID"),
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u32>, Query, description = "Posts per page (default: 12)")
    ),
    responses(
        (status = 200, description = "User's posts", body = Vec<PostResponse>)
    )
)]
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse> {
    let posts = state
        .post_service
        .get_user_posts(author_id, query.page.unwrap_or(1), query.limit.unwrap_or(12))
        .await?;

    Ok((StatusCode::OK, Json(posts)))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let post = state.post_service.create_post(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Like or unlike a post (toggle)
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Like state toggled", body = LikeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (is_liked, likes_count) = state.post_service.toggle_like(post_id, user_id).await?;

    Ok((StatusCode::OK, Json(LikeResponse { is_liked, likes_count })))
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let comment = state
        .post_service
        .add_comment(post_id, user_id, &payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete one of your own posts
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.post_service.delete_post(post_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
