use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::TableEntity;

#[derive(sqlx::Type, Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[sqlx(type_name = "authentication_token_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Registration,
    Recover,
    Login,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct AuthenticationToken {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Opaque random value handed out in the invitation link.
    pub token: String,
    pub token_type: TokenType,
    pub active: bool,
    pub created_at: OffsetDateTime,
}

impl AuthenticationToken {
    /// Tokens carry no expiry column; age against the configured
    /// time-to-live decides validity.
    pub fn is_expired(&self, ttl: Duration, now: OffsetDateTime) -> bool {
        self.created_at + ttl < now
    }
}

#[cfg(test)]
impl AuthenticationToken {
    /// An active registration token freshly created for `user_id`.
    pub fn fixture(user_id: Uuid) -> Self {
        AuthenticationToken {
            id: Uuid::new_v4(),
            user_id,
            token: Uuid::new_v4().to_string(),
            token_type: TokenType::Registration,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl TableEntity for AuthenticationToken {
    const TABLE: &'static str = "authentication_tokens";
}
