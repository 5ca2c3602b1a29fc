use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{authentication_token::AuthenticationToken, user::User};

/// Read-only lookups backing the setup wizard. The flow never writes:
/// token activation and expiry housekeeping live elsewhere.
#[async_trait]
pub trait SetupRepository: Send + Sync {
    /// A user eligible for setup: exists, not soft-deleted, not yet active.
    async fn find_setup_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;

    /// The active registration token matching both the user and the
    /// token value, if any.
    async fn find_active_registration_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<AuthenticationToken>, sqlx::Error>;
}
