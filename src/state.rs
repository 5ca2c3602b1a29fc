use crate::config::Config;
use crate::db::setup_repository::SetupRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn SetupRepository>,
    pub config: Arc<Config>,
}
