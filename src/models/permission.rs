use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TableEntity;

#[derive(sqlx::Type, Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[repr(i32)]
pub enum PermissionType {
    Read = 1,
    Update = 7,
    Owner = 15,
}

/// Grants a user a level of access on a resource. Rows become orphans
/// when the referenced resource or user disappears.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Permission {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub user_id: Uuid,
    pub permission_type: PermissionType,
    pub created_at: time::OffsetDateTime,
}

impl TableEntity for Permission {
    const TABLE: &'static str = "permissions";
}

#[cfg(test)]
impl Permission {
    pub fn fixture(resource_id: Uuid, user_id: Uuid) -> Self {
        Permission {
            id: Uuid::new_v4(),
            resource_id,
            user_id,
            permission_type: PermissionType::Read,
            created_at: time::OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{resource::Resource, user::User};

    #[test]
    fn test_fixture_links_resource_and_user() {
        let resource = Resource::fixture();
        let user = User::fixture();
        let permission = Permission::fixture(resource.id, user.id);

        assert_eq!(permission.resource_id, resource.id);
        assert_eq!(permission.user_id, user.id);
        assert_eq!(permission.permission_type, PermissionType::Read);
    }
}
