use std::sync::Arc;

use redis::{aio::ConnectionManager, Client};
use tokio::sync::OnceCell;

/// One reconnecting multiplexed connection shared by every clone.
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RedisClient {
    /// Validates the URL; the connection is opened by the first command.
    pub fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        Ok(RedisClient {
            client,
            conn: Arc::new(OnceCell::new()),
        })
    }

    /// A handle on the shared connection. A failed first connect is retried
    /// on the next call.
    pub async fn conn(&self) -> redis::RedisResult<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(conn.clone())
    }

    /// Fails fast at startup when Redis is unreachable.
    pub async fn ping(&self) -> redis::RedisResult<()> {
        let mut conn = self.conn().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::{parse_commands, spawn};
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn parses_pipelined_commands() {
        let buf = b"*1\r\n$4\r\nPING\r\n*2\r\n$3\r\nget\r\n$1\r\nk\r\n*1\r\n$4\r\nPI";
        assert_eq!(
            parse_commands(buf),
            (vec!["PING".to_string(), "GET".to_string()], 34)
        );
    }

    #[tokio::test]
    async fn commands_share_one_connection() {
        let server = spawn(|_| b"+PONG\r\n".as_slice()).await;

        let redis = RedisClient::new(&server.url).unwrap();
        let copy = redis.clone();
        for _ in 0..3 {
            redis.ping().await.unwrap();
            copy.ping().await.unwrap();
        }

        assert_eq!(server.accepted.load(Ordering::SeqCst), 1);
    }
}
