use crate::domain::{
    shared::{errors::DomainError, pagination::PaginationRequest},
    social::{
        comment::{Comment, NewComment},
        post::{NewPost, Post},
        repository::SocialRepository,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const POST_SELECT: &str = "SELECT p.id, p.community_id, p.author_id, \
        pr.display_name AS author_name, p.content, p.image_urls, p.needs_review, \
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count, \
        p.created_at \
     FROM posts p \
     LEFT JOIN profiles pr ON pr.user_id = p.author_id";

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.author_id, \
        pr.display_name AS author_name, c.content, c.needs_review, c.created_at \
     FROM comments c \
     LEFT JOIN profiles pr ON pr.user_id = c.author_id";

pub struct SqlxSocialRepository {
    pub pool: PgPool,
}

impl SqlxSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialRepository for SqlxSocialRepository {
    async fn create_post(&self, post: NewPost) -> Result<Post, DomainError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO posts (id, community_id, author_id, content, image_urls, needs_review)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(post.community_id)
        .bind(post.author_id)
        .bind(&post.content)
        .bind(&post.image_urls)
        .bind(post.needs_review)
        .execute(&self.pool)
        .await?;

        self.find_post(id)
            .await?
            .ok_or_else(|| DomainError::InfrastructureError("post vanished after insert".into()))
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        community_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<Vec<Post>, DomainError> {
        let page = page.normalized();
        let posts = sqlx::query_as::<_, Post>(&format!(
            "{} WHERE p.community_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            POST_SELECT
        ))
        .bind(community_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, content, needs_review)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.needs_review)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, Comment>(&format!(
            "{} WHERE c.post_id = $1 ORDER BY c.created_at ASC",
            COMMENT_SELECT
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
