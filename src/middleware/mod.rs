use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::cache::SessionData;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session_id";

/// The caller's session, if the request carries a live `session_id` cookie.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: Option<String>,
    pub data: Option<SessionData>,
}

impl CurrentSession {
    /// Logged-in user id.
    pub fn user_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.user_id.as_deref())
    }

    pub fn train_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.train_id.as_deref())
    }
}

/// Value of a cookie from the `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for a session token.
pub fn session_cookie(token: &str, max_age_seconds: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

// Session extractor. Requests without the cookie never touch Redis.
impl FromRequestParts<Arc<crate::AppState>> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE) else {
            return Ok(CurrentSession {
                token: None,
                data: None,
            });
        };

        let data = state.cache.load_session(&token).await?;
        Ok(CurrentSession {
            token: data.as_ref().map(|_| token),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("lang=ko; session_id=abc-123"),
        );
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE).as_deref(),
            Some("abc-123")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("tok", 60);
        assert!(cookie.starts_with("session_id=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=60"));
    }
}
