use crate::error::{AppError, Result};
use uuid::Uuid;

use super::user_dto::UpdateProfileRequest;
use super::user_models::UserResponse;
use super::user_repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let followers = self.repo.followers_of(user_id).await?;
        let following = self.repo.following_of(user_id).await?;

        Ok(UserResponse::from_parts(user, followers, following))
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<UserResponse>> {
        let users = self.repo.search(search, 20).await?;

        let mut responses = Vec::with_capacity(users.len());
        for user in users {
            let followers = self.repo.followers_of(user.id).await?;
            let following = self.repo.following_of(user.id).await?;
            responses.push(UserResponse::from_parts(user, followers, following));
        }

        Ok(responses)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        if let Some(ref username) = payload.username {
            if let Some(existing) = self.repo.find_by_username(username).await? {
                if existing.id != user_id {
                    return Err(AppError::Conflict("Username already taken".to_string()));
                }
            }
        }

        let user = self
            .repo
            .update_profile(
                user_id,
                payload.username.as_deref(),
                payload.bio.as_deref(),
                payload.profile_picture.as_deref(),
            )
            .await?;

        let followers = self.repo.followers_of(user_id).await?;
        let following = self.repo.following_of(user_id).await?;

        Ok(UserResponse::from_parts(user, followers, following))
    }

    /// Toggles the follow edge from `current_user_id` to `target_user_id`
    /// and reports the resulting state.
    pub async fn toggle_follow(&self, current_user_id: Uuid, target_user_id: Uuid) -> Result<bool> {
        if current_user_id == target_user_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }

        self.repo
            .find_by_id(target_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if self.repo.is_following(current_user_id, target_user_id).await? {
            self.repo.remove_follow(current_user_id, target_user_id).await?;
            Ok(false)
        } else {
            self.repo.add_follow(current_user_id, target_user_id).await?;
            Ok(true)
        }
    }
}
