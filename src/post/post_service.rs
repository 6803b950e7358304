use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::user::UserRepository;

use super::post_dto::{CommentResponse, CreatePostRequest, PostResponse};
use super::post_models::{CommentWithAuthor, PostLike, PostWithAuthor};
use super::post_repository::PostRepository;

#[derive(Clone)]
pub struct PostService {
    repo: PostRepository,
    user_repo: UserRepository,
}

/// Pulls `#word` tokens out of a caption, lowercased and deduplicated,
/// keeping first-occurrence order.
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut chars = caption.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '#' {
            continue;
        }
        let rest = &caption[i + 1..];
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end == 0 {
            continue;
        }
        let tag = rest[..end].to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        // Skip past the consumed tag body.
        while let Some((j, _)) = chars.peek() {
            if *j <= i + end {
                chars.next();
            } else {
                break;
            }
        }
    }

    tags
}

impl PostService {
    pub fn new(repo: PostRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        payload: CreatePostRequest,
    ) -> Result<PostResponse> {
        if payload.image_url.trim().is_empty() {
            return Err(AppError::Validation("Image URL is required".to_string()));
        }

        let caption = payload.caption.unwrap_or_default();
        let location = payload.location.unwrap_or_default();
        let hashtags = extract_hashtags(&caption);

        let post = self
            .repo
            .create(user_id, &payload.image_url, &caption, &location, &hashtags)
            .await?;

        let author = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(PostResponse {
            id: post.id,
            user_id: post.user_id,
            username: author.username,
            user_profile_picture: author.profile_picture,
            image_url: post.image_url,
            caption: post.caption,
            location: post.location,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: post.created_at,
        })
    }

    pub async fn get_feed(&self, page: u32, limit: u32) -> Result<Vec<PostResponse>> {
        let (limit, offset) = to_limit_offset(page, limit);
        let posts = self.repo.find_feed(limit, offset).await?;
        self.assemble(posts).await
    }

    pub async fn get_user_posts(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Vec<PostResponse>> {
        let (limit, offset) = to_limit_offset(page, limit);
        let posts = self.repo.find_by_user(user_id, limit, offset).await?;
        self.assemble(posts).await
    }

    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(bool, i64)> {
        self.repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let is_liked = if self.repo.is_liked(post_id, user_id).await? {
            self.repo.remove_like(post_id, user_id).await?;
            false
        } else {
            self.repo.add_like(post_id, user_id).await?;
            true
        };

        let likes_count = self.repo.count_likes(post_id).await?;

        Ok((is_liked, likes_count))
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CommentResponse> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        self.repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let comment = self.repo.add_comment(post_id, user_id, content).await?;
        let author = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(CommentResponse {
            id: comment.id,
            user_id: comment.user_id,
            username: author.username,
            content: comment.content,
            created_at: comment.created_at,
        })
    }

    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let post = self
            .repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this post".to_string(),
            ));
        }

        self.repo.delete(post_id).await
    }

    /// Attaches liker lists and comment threads to a page of posts with
    /// two batch queries rather than one pair per post.
    async fn assemble(&self, posts: Vec<PostWithAuthor>) -> Result<Vec<PostResponse>> {
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for PostLike { post_id, user_id } in self.repo.likes_for(&post_ids).await? {
            likes_by_post.entry(post_id).or_default().push(user_id);
        }

        let mut comments_by_post: HashMap<Uuid, Vec<CommentResponse>> = HashMap::new();
        for comment in self.repo.comments_for(&post_ids).await? {
            let CommentWithAuthor {
                id,
                post_id,
                user_id,
                username,
                content,
                created_at,
            } = comment;
            comments_by_post.entry(post_id).or_default().push(CommentResponse {
                id,
                user_id,
                username,
                content,
                created_at,
            });
        }

        Ok(posts
            .into_iter()
            .map(|post| PostResponse {
                likes: likes_by_post.remove(&post.id).unwrap_or_default(),
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                id: post.id,
                user_id: post.user_id,
                username: post.username,
                user_profile_picture: post.profile_picture,
                image_url: post.image_url,
                caption: post.caption,
                location: post.location,
                created_at: post.created_at,
            })
            .collect())
    }
}

fn to_limit_offset(page: u32, limit: u32) -> (i64, i64) {
    let page = page.max(1) as i64;
    let limit = limit.max(1) as i64;
    // Saturate so absurd page numbers stay a valid empty page.
    (limit, (page - 1).saturating_mul(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_hashtags() {
        assert_eq!(
            extract_hashtags("sunset at the #beach with #friends"),
            vec!["beach", "friends"]
        );
    }

    #[test]
    fn hashtags_are_lowercased_and_deduplicated() {
        assert_eq!(
            extract_hashtags("#Travel #TRAVEL #travel"),
            vec!["travel"]
        );
    }

    #[test]
    fn bare_hash_is_ignored() {
        assert_eq!(extract_hashtags("just a # sign"), Vec::<String>::new());
        assert_eq!(extract_hashtags("trailing #"), Vec::<String>::new());
    }

    #[test]
    fn hashtag_stops_at_punctuation() {
        assert_eq!(extract_hashtags("loving it! #sunset, wow"), vec!["sunset"]);
    }

    #[test]
    fn underscores_and_digits_are_part_of_tags() {
        assert_eq!(
            extract_hashtags("#no_filter #2024"),
            vec!["no_filter", "2024"]
        );
    }

    #[test]
    fn empty_caption_yields_no_hashtags() {
        assert_eq!(extract_hashtags(""), Vec::<String>::new());
    }

    #[test]
    fn to_limit_offset_is_one_indexed_and_clamped() {
        assert_eq!(to_limit_offset(1, 10), (10, 0));
        assert_eq!(to_limit_offset(3, 12), (12, 24));
        assert_eq!(to_limit_offset(0, 0), (1, 0));
    }

    #[test]
    fn to_limit_offset_saturates_on_extreme_inputs() {
        let (_, offset) = to_limit_offset(u32::MAX, u32::MAX);
        assert!(offset >= 0);
        assert_eq!(offset, i64::MAX);
    }
}
