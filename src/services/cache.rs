use crate::core::MatchMode;
use crate::models::RecommendResponse;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

fn mode_tag(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::All => "all",
        MatchMode::Any => "any",
    }
}

fn recommendations_key(client_id: i64, mode: MatchMode) -> String {
    format!("rec:{}:{}", client_id, mode_tag(mode))
}

/// Two-tier cache for recommendation responses, keyed per client and mode.
///
/// L1 (moka, in-process) answers repeat requests on the same instance; L2
/// (Redis) is shared across instances. Entries are invalidated whenever a
/// client's preferences change, the client is deleted, or the listing pool
/// shrinks. Recommendations are best-effort, so a stale read during a
/// concurrent upsert is acceptable.
pub struct RecommendationCache {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl RecommendationCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Cached recommendations for a client under a mode, if present.
    pub async fn get_recommendations(
        &self,
        client_id: i64,
        mode: MatchMode,
    ) -> Result<Option<RecommendResponse>, CacheError> {
        let key = recommendations_key(client_id, mode);

        if let Some(bytes) = self.l1_cache.get(&key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                self.l1_cache
                    .insert(key, json.as_bytes().to_vec())
                    .await;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Store a computed recommendation response in both tiers.
    pub async fn put_recommendations(
        &self,
        client_id: i64,
        mode: MatchMode,
        response: &RecommendResponse,
    ) -> Result<(), CacheError> {
        let key = recommendations_key(client_id, mode);
        let json = serde_json::to_string(response)?;

        self.l1_cache
            .insert(key.clone(), json.as_bytes().to_vec())
            .await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(&key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("cached recommendations: {}", key);
        Ok(())
    }

    /// Drop both modes' entries for one client (preference change or client
    /// deletion).
    pub async fn invalidate_client(&self, client_id: i64) -> Result<(), CacheError> {
        for mode in [MatchMode::All, MatchMode::Any] {
            let key = recommendations_key(client_id, mode);
            self.l1_cache.invalidate(&key).await;
            let mut conn = self.redis.lock().await;
            redis::cmd("DEL").arg(&key).query_async::<()>(&mut *conn).await?;
        }
        Ok(())
    }

    /// Drop every cached recommendation (the listing pool changed, so any
    /// client's result set may be stale).
    pub async fn invalidate_all(&self) -> Result<(), CacheError> {
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg("rec:*")
            .query_async(&mut *conn)
            .await?;

        if !keys.is_empty() {
            redis::cmd("DEL")
                .arg(keys)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::debug!("invalidated all cached recommendations");
        Ok(())
    }
}
