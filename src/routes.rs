use crate::{
    auth::{
        auth_dto::{AuthResponse, LoginRequest, RegisterRequest},
        auth_handlers,
    },
    message::{
        message_dto::{ConversationResponse, MarkReadResponse, SendMessageRequest},
        message_handlers,
        message_models::{Message, MessageResponse, MessageType},
    },
    middleware::auth_middleware,
    post::{
        post_dto::{CommentRequest, CommentResponse, CreatePostRequest, LikeResponse, PostResponse},
        post_handlers,
        post_models::{Comment, Post},
    },
    state::AppState,
    user::{
        user_dto::{FollowResponse, UpdateProfileRequest},
        user_handlers,
        user_models::{User, UserProfile, UserResponse},
    },
};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::auth_handlers::register,
        crate::auth::auth_handlers::login,
        crate::auth::auth_handlers::me,
        crate::user::user_handlers::get_users,
        crate::user::user_handlers::get_user,
        crate::user::user_handlers::update_profile,
        crate::user::user_handlers::follow_user,
        crate::post::post_handlers::get_feed,
        crate::post::post_handlers::get_user_posts,
        crate::post::post_handlers::create_post,
        crate::post::post_handlers::like_post,
        crate::post::post_handlers::add_comment,
        crate::post::post_handlers::delete_post,
        crate::message::message_handlers::send_message,
        crate::message::message_handlers::get_conversations,
        crate::message::message_handlers::get_history,
        crate::message::message_handlers::mark_read,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateProfileRequest,
            FollowResponse,
            User,
            UserProfile,
            UserResponse,
            CreatePostRequest,
            CommentRequest,
            PostResponse,
            CommentResponse,
            LikeResponse,
            Post,
            Comment,
            SendMessageRequest,
            ConversationResponse,
            MarkReadResponse,
            Message,
            MessageResponse,
            MessageType,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User profile and follow endpoints"),
        (name = "posts", description = "Post, like and comment endpoints"),
        (name = "messages", description = "Direct messaging endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
            "http://localhost:5173".parse().unwrap(),
        ]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .merge(
            Router::new()
                .route("/me", get(auth_handlers::me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route("/", get(user_handlers::get_users))
        .route("/profile", put(user_handlers::update_profile))
        .route("/:id", get(user_handlers::get_user))
        .route("/:id/follow", post(user_handlers::follow_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Reading posts is open to anonymous browsing; writes require auth.
    let post_routes = Router::new()
        .route("/", get(post_handlers::get_feed))
        .route("/user/:user_id", get(post_handlers::get_user_posts))
        .merge(
            Router::new()
                .route("/", post(post_handlers::create_post))
                .route("/:id", delete(post_handlers::delete_post))
                .route("/:id/like", post(post_handlers::like_post))
                .route("/:id/comment", post(post_handlers::add_comment))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let message_routes = Router::new()
        .route("/", post(message_handlers::send_message))
        .route("/conversations", get(message_handlers::get_conversations))
        .route("/:user_id", get(message_handlers::get_history))
        .route("/:user_id/read", put(message_handlers::mark_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/posts", post_routes)
        .nest("/messages", message_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
