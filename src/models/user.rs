use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TableEntity;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Set once the user has completed the setup wizard.
    pub active: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: time::OffsetDateTime,
}

impl TableEntity for User {
    const TABLE: &'static str = "users";
}

#[cfg(test)]
impl User {
    /// A user still eligible for setup: registered, not yet active.
    pub fn fixture() -> Self {
        User {
            id: Uuid::new_v4(),
            username: "ada@corp.io".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            active: false,
            deleted: false,
            created_at: time::OffsetDateTime::now_utc(),
        }
    }
}
