use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::post_models::{Comment, CommentWithAuthor, Post, PostLike, PostWithAuthor};

#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

const AUTHOR_SELECT: &str =
    "SELECT p.id, p.user_id, u.username, u.profile_picture, p.image_url,
            p.caption, p.location, p.created_at
     FROM posts p
     JOIN users u ON u.id = p.user_id";

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        image_url: &str,
        caption: &str,
        location: &str,
        hashtags: &[String],
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (user_id, image_url, caption, location)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(image_url)
        .bind(caption)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        if !hashtags.is_empty() {
            sqlx::query(
                "INSERT INTO post_hashtags (post_id, hashtag)
                 SELECT $1, unnest($2::text[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(post.id)
            .bind(hashtags)
            .execute(&self.pool)
            .await?;
        }

        Ok(post)
    }

    pub async fn find_feed(&self, limit: i64, offset: i64) -> Result<Vec<PostWithAuthor>> {
        let query = format!(
            "{AUTHOR_SELECT}
             WHERE p.is_archived = FALSE
             ORDER BY p.created_at DESC
             LIMIT $1 OFFSET $2"
        );
        let posts = sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>> {
        let query = format!(
            "{AUTHOR_SELECT}
             WHERE p.user_id = $1 AND p.is_archived = FALSE
             ORDER BY p.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    pub async fn delete(&self, post_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn likes_for(&self, post_ids: &[Uuid]) -> Result<Vec<PostLike>> {
        let likes = sqlx::query_as::<_, PostLike>(
            "SELECT post_id, user_id FROM post_likes
             WHERE post_id = ANY($1)
             ORDER BY created_at",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes)
    }

    pub async fn comments_for(&self, post_ids: &[Uuid]) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.post_id = ANY($1)
             ORDER BY c.created_at",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_likes(&self, post_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn add_comment(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
