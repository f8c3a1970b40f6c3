use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::CacheService;

/// Server-side session state behind the `session_id` cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<String>,
    /// Train whose seat map was opened last.
    pub train_id: Option<String>,
    /// One-shot messages for the next rendered page.
    #[serde(default)]
    pub flashes: Vec<String>,
}

impl SessionData {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

impl CacheService {
    /// Stores a new session and returns its token.
    pub async fn create_session(&self, data: &SessionData) -> redis::RedisResult<String> {
        let token = uuid::Uuid::new_v4().to_string();
        self.save_session(&token, data).await?;
        debug!("Created session for {:?}", data.user_id);
        Ok(token)
    }

    /// `None` for unknown, expired or unreadable sessions.
    pub async fn load_session(&self, token: &str) -> redis::RedisResult<Option<SessionData>> {
        let mut conn = self.redis.conn().await?;
        let raw: Option<String> = conn.get(session_key(token)).await?;
        Ok(raw.and_then(|data| match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                None
            }
        }))
    }

    /// Writes the session back and refreshes its TTL.
    pub async fn save_session(&self, token: &str, data: &SessionData) -> redis::RedisResult<()> {
        let payload = serde_json::to_string(data).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn().await?;
        conn.set_ex(session_key(token), payload, self.session_ttl_seconds)
            .await
    }

    pub async fn destroy_session(&self, token: &str) -> redis::RedisResult<()> {
        let mut conn = self.redis.conn().await?;
        conn.del(session_key(token)).await
    }
}
