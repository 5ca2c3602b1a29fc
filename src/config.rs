use std::env;

use time::Duration;

/// Registration tokens stay valid for three days unless overridden.
pub const DEFAULT_SETUP_TOKEN_TTL_SECONDS: i64 = 3 * 24 * 60 * 60;

pub struct Config {
    pub database_url: String,
    pub frontend_origin: String,
    /// Shown as the page title when the setup wizard is requested as HTML.
    pub app_meta_description: String,
    pub setup_token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let frontend_origin = env::var("FRONTEND_ORIGIN").expect("FRONTEND_ORIGIN must be set");

        let app_meta_description = env::var("APP_META_DESCRIPTION")
            .unwrap_or_else(|_| "Coffre - Open source password manager for teams".to_string());

        let setup_token_ttl = env::var("SETUP_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .map(Duration::seconds)
            .unwrap_or(Duration::seconds(DEFAULT_SETUP_TOKEN_TTL_SECONDS));

        Config {
            database_url,
            frontend_origin,
            app_meta_description,
            setup_token_ttl,
        }
    }
}
