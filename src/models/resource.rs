use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TableEntity;

/// A shared credential entry. Soft-deleted rows stay in place so
/// history and permissions can be cleaned up separately.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    pub username: Option<String>,
    pub uri: Option<String>,
    pub deleted: bool,
    pub created_at: time::OffsetDateTime,
}

impl TableEntity for Resource {
    const TABLE: &'static str = "resources";
}

#[cfg(test)]
impl Resource {
    pub fn fixture() -> Self {
        Resource {
            id: Uuid::new_v4(),
            name: "wiki".to_string(),
            username: Some("admin".to_string()),
            uri: Some("https://wiki.corp.io".to_string()),
            deleted: false,
            created_at: time::OffsetDateTime::now_utc(),
        }
    }
}
