use crate::domain::{
    intent::{UserIntent, parse_stored_intents},
    profile::{Profile, ProfileRepository},
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    display_name: Option<String>,
    intents: Vec<String>,
    onboarded_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            display_name: row.display_name,
            intents: parse_stored_intents(&row.intents),
            onboarded_at: row.onboarded_at,
        }
    }
}

pub struct SqlxProfileRepository {
    pub pool: PgPool,
}

impl SqlxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, display_name, intents, onboarded_at FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn complete_onboarding(
        &self,
        user_id: Uuid,
        display_name: Option<String>,
        intents: &[UserIntent],
    ) -> Result<Profile, DomainError> {
        let tags: Vec<&str> = intents.iter().map(UserIntent::as_str).collect();

        // The WHERE on the conflict branch keeps onboarded profiles untouched;
        // no row comes back in that case.
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO profiles (user_id, display_name, intents, onboarded_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                display_name = COALESCE(EXCLUDED.display_name, profiles.display_name),
                intents = EXCLUDED.intents,
                onboarded_at = EXCLUDED.onboarded_at
             WHERE profiles.onboarded_at IS NULL
             RETURNING user_id, display_name, intents, onboarded_at",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(&tags)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::from)
            .ok_or_else(|| DomainError::Conflict("Onboarding already completed".into()))
    }
}
