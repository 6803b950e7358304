pub mod post_dto;
pub mod post_handlers;
pub mod post_models;
pub mod post_repository;
pub mod post_service;

pub use post_models::{Comment, Post};
pub use post_repository::PostRepository;
pub use post_service::PostService;
