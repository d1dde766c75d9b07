use crate::domain::{
    community::{
        entity::{Community, Membership},
        repository::CommunityRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const COMMUNITY_SELECT: &str = "SELECT c.id, c.name, c.description, \
        (SELECT COUNT(*) FROM community_members m WHERE m.community_id = c.id) AS member_count, \
        c.gym_id, g.latitude AS gym_latitude, g.longitude AS gym_longitude, c.is_active, \
        (SELECT COUNT(*) FROM community_events e \
          WHERE e.community_id = c.id AND e.starts_at > NOW()) AS upcoming_event_count, \
        c.created_at \
     FROM communities c \
     LEFT JOIN gyms g ON g.id = c.gym_id";

pub struct SqlxCommunityRepository {
    pub pool: PgPool,
}

impl SqlxCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityRepository for SqlxCommunityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>, DomainError> {
        let row = sqlx::query_as::<_, Community>(&format!("{} WHERE c.id = $1", COMMUNITY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_active(&self) -> Result<Vec<Community>, DomainError> {
        let rows = sqlx::query_as::<_, Community>(&format!(
            "{} WHERE c.is_active ORDER BY member_count DESC, c.name ASC",
            COMMUNITY_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_candidates(&self) -> Result<Vec<Community>, DomainError> {
        let rows = sqlx::query_as::<_, Community>(COMMUNITY_SELECT)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn join(&self, community_id: Uuid, user_id: Uuid) -> Result<Membership, DomainError> {
        // Re-joining returns the original membership instead of failing.
        let membership = sqlx::query_as::<_, Membership>(
            "INSERT INTO community_members (community_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (community_id, user_id)
             DO UPDATE SET joined_at = community_members.joined_at
             RETURNING community_id, user_id, joined_at",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(membership)
    }

    async fn leave(&self, community_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
                .bind(community_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_member(&self, community_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2)",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn member_community_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT community_id FROM community_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
