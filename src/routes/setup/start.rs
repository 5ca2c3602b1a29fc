use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    models::{authentication_token::AuthenticationToken, user::User},
    responses::JsonResponse,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum SetupStartError {
    #[error("{0}")]
    BadRequest(String),
    /// Field-scoped so clients can render targeted form feedback,
    /// unlike the generic BadRequest cases.
    #[error("The token is expired.")]
    TokenExpired,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Entry point of the setup wizard. A JSON request validates the
/// invitation and returns the resolved user; anything else gets the
/// single-page setup application shell.
pub async fn setup_start(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !is_json_request(&headers) {
        return render_setup_application(&state);
    }

    match retrieve_setup_info(&state, &user_id, &token).await {
        Ok(user) => {
            JsonResponse::success_with_body("The operation was successful.", json!({ "user": user }))
                .into_response()
        }
        Err(SetupStartError::BadRequest(msg)) => JsonResponse::bad_request(&msg).into_response(),
        Err(SetupStartError::TokenExpired) => JsonResponse::validation_error(
            "The token is expired.",
            json!({ "token": { "expired": "The token is expired." } }),
        )
        .into_response(),
        Err(SetupStartError::Db(err)) => {
            eprintln!("Setup start lookup failed: {:?}", err);
            JsonResponse::server_error("Something went wrong").into_response()
        }
    }
}

fn is_json_request(headers: &HeaderMap) -> bool {
    [header::ACCEPT, header::CONTENT_TYPE].iter().any(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"))
    })
}

async fn retrieve_setup_info(
    state: &AppState,
    user_id: &str,
    token: &str,
) -> Result<User, SetupStartError> {
    let (user_id, token) = assert_request_sanity(user_id, token)?;
    let user = find_user(state, user_id).await?;
    let token = find_token(state, &user, &token).await?;
    assert_token_expiry(state, &token)?;
    Ok(user)
}

/// Both path parameters must be uuids; nothing is looked up otherwise.
fn assert_request_sanity(user_id: &str, token: &str) -> Result<(Uuid, Uuid), SetupStartError> {
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| SetupStartError::BadRequest("The user id is not valid.".to_string()))?;
    let token = Uuid::parse_str(token).map_err(|_| {
        SetupStartError::BadRequest("The authentication token is not valid.".to_string())
    })?;
    Ok((user_id, token))
}

async fn find_user(state: &AppState, user_id: Uuid) -> Result<User, SetupStartError> {
    match state.db.find_setup_user(user_id).await? {
        Some(user) => Ok(user),
        None => Err(SetupStartError::BadRequest(
            "The user does not exist or is already active.".to_string(),
        )),
    }
}

async fn find_token(
    state: &AppState,
    user: &User,
    token: &Uuid,
) -> Result<AuthenticationToken, SetupStartError> {
    match state
        .db
        .find_active_registration_token(user.id, &token.to_string())
        .await?
    {
        Some(token) => Ok(token),
        None => Err(SetupStartError::BadRequest(
            "The authentication token is not valid.".to_string(),
        )),
    }
}

/// Expiry is reported, not acted on: the flow issues no replacement
/// token and flips no flags.
fn assert_token_expiry(
    state: &AppState,
    token: &AuthenticationToken,
) -> Result<(), SetupStartError> {
    if token.is_expired(state.config.setup_token_ttl, OffsetDateTime::now_utc()) {
        return Err(SetupStartError::TokenExpired);
    }
    Ok(())
}

fn render_setup_application(state: &AppState) -> Response {
    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
           <meta charset=\"utf-8\">\n\
           <title>{}</title>\n\
         </head>\n\
         <body>\n\
           <div id=\"setup-container\"></div>\n\
         </body>\n\
         </html>\n",
        state.config.app_meta_description
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        config::{Config, DEFAULT_SETUP_TOKEN_TTL_SECONDS},
        db::mock_db::MockDb,
        models::{authentication_token::AuthenticationToken, user::User},
        state::AppState,
    };

    use super::setup_start;

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            database_url: String::new(),
            frontend_origin: "http://localhost".into(),
            app_meta_description: "Coffre test instance".into(),
            setup_token_ttl: Duration::seconds(DEFAULT_SETUP_TOKEN_TTL_SECONDS),
        })
    }

    fn test_app(db: MockDb) -> Router {
        Router::new()
            .route("/setup/start/{user_id}/{token}", get(setup_start))
            .with_state(AppState {
                db: Arc::new(db),
                config: test_config(),
            })
    }

    fn json_request(user_id: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(format!("/setup/start/{}/{}", user_id, token))
            .header("Accept", "application/json")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_start_success_returns_user() {
        let user = User::fixture();
        let user_id = user.id;
        let token = AuthenticationToken::fixture(user_id);
        let token_value = token.token.clone();

        let db = MockDb {
            find_setup_user_fn: Box::new(move |_| Ok(Some(user.clone()))),
            find_registration_token_fn: Box::new(move |_, _| Ok(Some(token.clone()))),
        };

        let res = test_app(db)
            .oneshot(json_request(&user_id.to_string(), &token_value))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["success"], Value::Bool(true));
        assert_eq!(json["body"]["user"]["id"], user_id.to_string());
        // The soft-delete flag never leaves the backend.
        assert!(json["body"]["user"].get("deleted").is_none());
    }

    #[tokio::test]
    async fn test_start_malformed_user_id_skips_lookups() {
        let db = MockDb {
            find_setup_user_fn: Box::new(|_| panic!("store must not be queried")),
            find_registration_token_fn: Box::new(|_, _| panic!("store must not be queried")),
        };

        let res = test_app(db)
            .oneshot(json_request("not-a-uuid", &Uuid::new_v4().to_string()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let json = body_json(res).await;
        assert_eq!(json["message"], "The user id is not valid.");
    }

    #[tokio::test]
    async fn test_start_malformed_token_skips_lookups() {
        let db = MockDb {
            find_setup_user_fn: Box::new(|_| panic!("store must not be queried")),
            find_registration_token_fn: Box::new(|_, _| panic!("store must not be queried")),
        };

        let res = test_app(db)
            .oneshot(json_request(&Uuid::new_v4().to_string(), "nope"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let json = body_json(res).await;
        assert_eq!(json["message"], "The authentication token is not valid.");
    }

    #[tokio::test]
    async fn test_start_unknown_or_active_user() {
        let db = MockDb {
            find_setup_user_fn: Box::new(|_| Ok(None)),
            ..Default::default()
        };

        let res = test_app(db)
            .oneshot(json_request(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let json = body_json(res).await;
        assert_eq!(json["message"], "The user does not exist or is already active.");
    }

    #[tokio::test]
    async fn test_start_token_not_found() {
        let user = User::fixture();

        let db = MockDb {
            find_setup_user_fn: Box::new(move |_| Ok(Some(user.clone()))),
            find_registration_token_fn: Box::new(|_, _| Ok(None)),
        };

        let res = test_app(db)
            .oneshot(json_request(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let json = body_json(res).await;
        assert_eq!(json["message"], "The authentication token is not valid.");
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_start_expired_token_reports_field_error() {
        let user = User::fixture();
        let user_id = user.id;
        let mut token = AuthenticationToken::fixture(user_id);
        token.created_at = time::OffsetDateTime::now_utc() - Duration::days(4);
        let token_value = token.token.clone();

        let db = MockDb {
            find_setup_user_fn: Box::new(move |_| Ok(Some(user.clone()))),
            find_registration_token_fn: Box::new(move |_, _| Ok(Some(token.clone()))),
        };

        let res = test_app(db)
            .oneshot(json_request(&user_id.to_string(), &token_value))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let json = body_json(res).await;
        assert_eq!(json["message"], "The token is expired.");
        assert_eq!(json["errors"]["token"]["expired"], "The token is expired.");
    }

    #[tokio::test]
    async fn test_start_store_failure() {
        let db = MockDb {
            find_setup_user_fn: Box::new(|_| Err(sqlx::Error::RowNotFound)),
            ..Default::default()
        };

        let res = test_app(db)
            .oneshot(json_request(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_start_page_request_renders_shell_without_validation() {
        let db = MockDb {
            find_setup_user_fn: Box::new(|_| panic!("store must not be queried")),
            find_registration_token_fn: Box::new(|_, _| panic!("store must not be queried")),
        };

        // No JSON accept header, and deliberately malformed params: the
        // page branch performs no validation at all.
        let req = Request::builder()
            .method("GET")
            .uri("/setup/start/whatever/whatever")
            .body(Body::empty())
            .unwrap();

        let res = test_app(db).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<title>Coffre test instance</title>"));
    }
}
