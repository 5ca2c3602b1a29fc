use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{authentication_token::AuthenticationToken, user::User};

use super::setup_repository::SetupRepository;

#[allow(dead_code)]
type FindSetupUserFn = Box<dyn Fn(Uuid) -> Result<Option<User>, sqlx::Error> + Send + Sync>;

#[allow(dead_code)]
type FindRegistrationTokenFn =
    Box<dyn Fn(Uuid, &str) -> Result<Option<AuthenticationToken>, sqlx::Error> + Send + Sync>;

#[allow(dead_code)]
pub struct MockDb {
    pub find_setup_user_fn: FindSetupUserFn,
    pub find_registration_token_fn: FindRegistrationTokenFn,
}

impl Default for MockDb {
    fn default() -> Self {
        Self {
            find_setup_user_fn: Box::new(|_| Ok(None)),
            find_registration_token_fn: Box::new(|_, _| Ok(None)),
        }
    }
}

#[async_trait]
impl SetupRepository for MockDb {
    async fn find_setup_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        (self.find_setup_user_fn)(user_id)
    }

    async fn find_active_registration_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<AuthenticationToken>, sqlx::Error> {
        (self.find_registration_token_fn)(user_id, token)
    }
}
