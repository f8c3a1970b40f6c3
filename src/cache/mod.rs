use crate::{database::Database, redis_client::RedisClient};

pub mod seats;
pub mod sessions;

pub use sessions::SessionData;

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    db: Database,
    seat_ttl_seconds: u64,
    session_ttl_seconds: u64,
}

impl CacheService {
    pub fn new(
        redis: RedisClient,
        db: Database,
        seat_ttl_seconds: u64,
        session_ttl_seconds: u64,
    ) -> Self {
        Self {
            redis,
            db,
            seat_ttl_seconds,
            session_ttl_seconds,
        }
    }

    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }
}
