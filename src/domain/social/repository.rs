use super::{
    comment::{Comment, NewComment},
    post::{NewPost, Post},
};
use crate::domain::shared::{errors::DomainError, pagination::PaginationRequest};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialRepository: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn list_posts(
        &self,
        community_id: Uuid,
        page: &PaginationRequest,
    ) -> Result<Vec<Post>, DomainError>;
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, DomainError>;
    async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}
