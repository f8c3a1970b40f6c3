use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::cache::SessionData;
use crate::error::AppError;
use crate::middleware::{cookie_value, session_cookie, SESSION_COOKIE};
use crate::models::{user::hash_password, User};
use crate::{views, AppState};

pub const LOGIN_FAILED: &str = "ID/PW 오류";
pub const MISSING_FIELDS: &str = "아이디와 비밀번호를 모두 입력해주세요.";
pub const DUPLICATE_USER: &str = "이미 존재하는 아이디입니다.";
pub const REGISTERED: &str = "회원가입이 완료되었습니다.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
}

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/* ---------- LOGIN ---------- */

async fn login_form() -> Result<Html<String>, AppError> {
    Ok(Html(views::login_page(None)?))
}

/// Opens a session for `username`, dropping the one the browser still holds.
async fn start_session(
    state: &AppState,
    headers: &HeaderMap,
    username: &str,
) -> Result<String, AppError> {
    if let Some(previous) = cookie_value(headers, SESSION_COOKIE) {
        if let Err(e) = state.cache.destroy_session(&previous).await {
            warn!("Failed to drop previous session: {:?}", e);
        }
    }
    Ok(state
        .cache
        .create_session(&SessionData::for_user(username))
        .await?)
}

// POST /
async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let user = User::find_by_username(&form.username, &state.db).await?;

    let verified = match user {
        Some(user) => {
            let password = form.password.clone();
            // bcrypt is CPU-bound
            tokio::task::spawn_blocking(move || {
                user.verify_password(&password).then_some(user.username)
            })
            .await?
        }
        None => None,
    };

    let Some(username) = verified else {
        info!("Login failed for {}", form.username);
        return Ok(Html(views::login_page(Some(LOGIN_FAILED))?).into_response());
    };

    let token = start_session(&state, &headers, &username).await?;
    info!("User {} logged in", username);

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&token, state.cache.session_ttl_seconds()),
        )],
        Redirect::to("/dashboard"),
    )
        .into_response())
}

/* ---------- REGISTER ---------- */

async fn register_form() -> Result<Html<String>, AppError> {
    Ok(Html(views::register_page(None, None)?))
}

// POST /register
async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Credentials>,
) -> Result<Html<String>, AppError> {
    if form.validate().is_err() {
        return Ok(Html(views::register_page(Some(MISSING_FIELDS), None)?));
    }

    if User::find_by_username(&form.username, &state.db)
        .await?
        .is_some()
    {
        return Ok(Html(views::register_page(Some(DUPLICATE_USER), None)?));
    }

    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    // ON CONFLICT catches a concurrent sign-up with the same name
    match User::create(&form.username, &password_hash, &state.db).await? {
        Some(id) => {
            info!("Registered user {} (id {})", form.username, id);
            Ok(Html(views::register_page(None, Some(REGISTERED))?))
        }
        None => Ok(Html(views::register_page(Some(DUPLICATE_USER), None)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::config::Config;
    use crate::database::Database;
    use crate::redis_client::{test_server, RedisClient};

    async fn state_against(server: &test_server::TestServer) -> Arc<AppState> {
        let url = server.url.clone();
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://booking@127.0.0.1:1/booking".to_string()),
            "REDIS_URL" => Some(url.clone()),
            _ => None,
        })
        .unwrap();
        let db = Database::connect_lazy(&config.database.url, 1).unwrap();
        let redis = RedisClient::new(&config.redis.url).unwrap();
        AppState::new(config, db, redis)
    }

    #[tokio::test]
    async fn logging_in_again_drops_the_previous_session() {
        let server = test_server::spawn(|name| match name {
            "DEL" => b":1\r\n".as_slice(),
            _ => b"+OK\r\n".as_slice(),
        })
        .await;
        let state = state_against(&server).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id=stale"));

        let token = start_session(&state, &headers, "kim").await.unwrap();

        assert_ne!(token, "stale");
        assert!(server.received("DEL"));
        assert!(server.received("SETEX"));
    }

    #[tokio::test]
    async fn first_login_deletes_nothing() {
        let server = test_server::spawn(|_| b"+OK\r\n".as_slice()).await;
        let state = state_against(&server).await;

        start_session(&state, &HeaderMap::new(), "kim").await.unwrap();

        assert!(!server.received("DEL"));
        assert!(server.received("SETEX"));
    }

    #[test]
    fn empty_credentials_fail_validation() {
        let form: Credentials = serde_urlencoded::from_str("username=kim").unwrap();
        assert!(form.validate().is_err());

        let form: Credentials = serde_urlencoded::from_str("username=kim&password=pw").unwrap();
        assert!(form.validate().is_ok());
    }
}
