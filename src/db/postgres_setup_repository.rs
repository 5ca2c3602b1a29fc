use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{authentication_token::AuthenticationToken, user::User};

use super::setup_repository::SetupRepository;

pub struct PostgresSetupRepository {
    pub pool: PgPool,
}

#[async_trait]
impl SetupRepository for PostgresSetupRepository {
    async fn find_setup_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id,
                   username,
                   first_name,
                   last_name,
                   active,
                   deleted,
                   created_at
            FROM users
            WHERE id = $1 AND deleted = false AND active = false
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_active_registration_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<AuthenticationToken>, sqlx::Error> {
        sqlx::query_as::<_, AuthenticationToken>(
            r#"
            SELECT id,
                   user_id,
                   token,
                   token_type,
                   active,
                   created_at
            FROM authentication_tokens
            WHERE user_id = $1
              AND token = $2
              AND token_type = 'registration'
              AND active = true
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}
