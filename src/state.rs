use std::sync::Arc;

use crate::{
    auth::AuthService,
    db::DbPool,
    message::{MessageRepository, MessageService},
    post::{PostRepository, PostService},
    user::{UserRepository, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub user_repository: UserRepository,
    pub post_repository: PostRepository,
    pub message_repository: MessageRepository,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub post_service: PostService,
    pub message_service: MessageService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
        }
    }
}
