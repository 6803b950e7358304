use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::Result, middleware::AuthUser, state::AppState};

use super::{
    user_dto::{FollowResponse, UpdateProfileRequest, UserQuery},
    user_models::UserResponse,
};

/// List users, optionally filtered by a search term
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("search" = Option<String>, Query, description = "Substring match on username or email")
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_users(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse> {
    let users = state.user_service.list_users(query.search.as_deref()).await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Get a user's profile by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_user(id).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already taken")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state.user_service.update_profile(user_id, payload).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Follow or unfollow a user (toggle)
#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID to follow or unfollow")
    ),
    responses(
        (status = 200, description = "Follow state toggled", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let is_following = state.user_service.toggle_follow(user_id, id).await?;

    Ok((StatusCode::OK, Json(FollowResponse { is_following })))
}
