use crate::domain::{
    gym::{entity::Gym, repository::GymRepository},
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SqlxGymRepository {
    pub pool: PgPool,
}

impl SqlxGymRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GymRepository for SqlxGymRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gym>, DomainError> {
        let gym = sqlx::query_as::<_, Gym>(
            "SELECT id, name, latitude, longitude, city, country, facilities, price_range, is_hidden, created_at
             FROM gyms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gym)
    }

    async fn list_all(&self) -> Result<Vec<Gym>, DomainError> {
        let gyms = sqlx::query_as::<_, Gym>(
            "SELECT id, name, latitude, longitude, city, country, facilities, price_range, is_hidden, created_at
             FROM gyms ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(gyms)
    }

    async fn member_gym_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT c.gym_id
             FROM community_members m
             JOIN communities c ON c.id = m.community_id
             WHERE m.user_id = $1 AND c.gym_id IS NOT NULL",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
