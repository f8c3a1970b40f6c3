use redis::AsyncCommands;
use tracing::{info, warn};

use crate::cache::CacheService;
use crate::models::SeatStatus;

fn seats_key(train_id: &str) -> String {
    format!("seats:{}", train_id)
}

impl CacheService {
    /// Seat statuses for a train, from the cache when possible.
    pub async fn seat_statuses(&self, train_id: &str) -> Result<Vec<SeatStatus>, sqlx::Error> {
        if let Ok(Some(seats)) = self.get_seats_from_cache(train_id).await {
            return Ok(seats);
        }

        let seats = SeatStatus::load_for_train(train_id, &self.db).await?;
        // Redis being down only costs us the cache
        if let Err(e) = self.save_seats_to_cache(train_id, &seats).await {
            warn!("Failed to cache seats for train {}: {:?}", train_id, e);
        }
        Ok(seats)
    }

    /// Drops the cached seat map of a train. Returns whether Redis accepted
    /// the delete; on failure the entry lives until its TTL.
    pub async fn invalidate_seats(&self, train_id: &str) -> bool {
        match self.delete_seats(train_id).await {
            Ok(()) => {
                info!("Invalidated seats cache for train {}", train_id);
                true
            }
            Err(e) => {
                warn!("Failed to invalidate seats cache for train {}: {:?}", train_id, e);
                false
            }
        }
    }

    async fn delete_seats(&self, train_id: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.conn().await?;
        conn.del(seats_key(train_id)).await
    }

    async fn get_seats_from_cache(
        &self,
        train_id: &str,
    ) -> Result<Option<Vec<SeatStatus>>, redis::RedisError> {
        let mut conn = self.redis.conn().await?;
        let data: Option<String> = conn.get(seats_key(train_id)).await?;
        match data {
            Some(data) => {
                let seats = serde_json::from_str(&data).map_err(|_| {
                    redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
                })?;
                Ok(Some(seats))
            }
            None => Ok(None),
        }
    }

    async fn save_seats_to_cache(
        &self,
        train_id: &str,
        seats: &[SeatStatus],
    ) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(seats).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn().await?;
        conn.set_ex(seats_key(train_id), data, self.seat_ttl_seconds)
            .await
    }
}
