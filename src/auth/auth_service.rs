use crate::error::{AppError, Result};
use crate::user::{UserRepository, UserResponse};

use super::jwt::create_jwt;
use super::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(UserResponse, String)> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self.user_repo.create(username, email, &password_hash).await?;

        let token = create_jwt(user.id, &user.email, &self.jwt_secret, self.jwt_expiration_hours)?;

        Ok((
            UserResponse::from_parts(user, Vec::new(), Vec::new()),
            token,
        ))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(UserResponse, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        verify_password(password, &user.password_hash)?;

        self.user_repo.touch_last_active(user.id).await?;

        let token = create_jwt(user.id, &user.email, &self.jwt_secret, self.jwt_expiration_hours)?;

        let followers = self.user_repo.followers_of(user.id).await?;
        let following = self.user_repo.following_of(user.id).await?;

        Ok((UserResponse::from_parts(user, followers, following), token))
    }
}
