//! # 리프레시 토큰 저장소
//!
//! 사용자당 하나의 리프레시 토큰을 Redis `refresh_token:{user_id}` 키에 저장합니다.
//! 새로 로그인하면 이전 토큰은 덮어써지고, 갱신에 쓰이거나 로그아웃하면 삭제됩니다.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use singleton_macro::repository;
use crate::caching::redis::RedisClient;
use crate::core::registry::Repository;
use crate::errors::AppResult;

/// 최소 TTL (1분)
const MIN_TTL_SECONDS: u64 = 60;

#[repository(name = "token", collection = "tokens")]
pub struct TokenRepository {
    redis: Arc<RedisClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenInfo {
    pub user_id: String,
    pub username: String,
    pub provider: String,
    pub login_at: i64,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl RefreshTokenInfo {
    /// 저장된 토큰과 일치하고 아직 만료되지 않았는지
    pub fn matches(&self, refresh_token: &str, now: i64) -> bool {
        self.refresh_token == refresh_token && self.expires_at > now
    }
}

pub fn refresh_token_key(user_id: &str) -> String {
    format!("refresh_token:{}", user_id)
}

impl TokenRepository {
    pub async fn store_refresh_token(
        &self,
        user_id: &str,
        username: &str,
        provider: &str,
        refresh_token: &str,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let safe_ttl = if ttl_seconds < MIN_TTL_SECONDS {
            log::warn!("TTL이 너무 작습니다 ({}초). 최소값 {}초로 설정합니다.", ttl_seconds, MIN_TTL_SECONDS);
            MIN_TTL_SECONDS
        } else {
            ttl_seconds
        };

        let now = Utc::now().timestamp();
        let token_info = RefreshTokenInfo {
            user_id: user_id.to_string(),
            username: username.to_string(),
            provider: provider.to_string(),
            login_at: now,
            refresh_token: refresh_token.to_string(),
            expires_at: now + safe_ttl as i64,
        };

        self.redis
            .set_with_expiry(&refresh_token_key(user_id), &token_info, safe_ttl)
            .await?;

        log::info!("Refresh token 저장 완료 - user_id: {}, ttl: {}초", user_id, safe_ttl);
        Ok(())
    }

    /// 저장된 토큰과 일치할 때만 꺼내고 지웁니다.
    ///
    /// 비교와 삭제가 한 번에 일어나므로 같은 토큰으로는 한 번만 갱신됩니다.
    /// 일치하지 않으면 저장된 최신 토큰은 그대로 둡니다.
    pub async fn consume_refresh_token(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> AppResult<Option<RefreshTokenInfo>> {
        let taken = self.redis
            .take_if_field_eq::<RefreshTokenInfo>(&refresh_token_key(user_id), "refresh_token", refresh_token)
            .await?;

        let now = Utc::now().timestamp();
        Ok(taken.filter(|token_info| token_info.matches(refresh_token, now)))
    }

    pub async fn delete_refresh_token(&self, user_id: &str) -> AppResult<()> {
        self.redis.del(&refresh_token_key(user_id)).await?;
        log::info!("Refresh token 삭제 - user_id: {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(expires_at: i64) -> RefreshTokenInfo {
        RefreshTokenInfo {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
            provider: "google".to_string(),
            login_at: 0,
            refresh_token: "refresh-abc".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_refresh_token_key() {
        assert_eq!(refresh_token_key("65f0"), "refresh_token:65f0");
    }

    #[test]
    fn test_matches_requires_same_token_and_future_expiry() {
        assert!(info(100).matches("refresh-abc", 50));
        assert!(!info(100).matches("other", 50));
        assert!(!info(100).matches("refresh-abc", 100));
    }

    #[actix_web::test]
    #[ignore] // Redis 서버 필요
    async fn test_refresh_token_is_consumed_once() {
        use crate::core::registry::ServiceLocator;

        ServiceLocator::set(Arc::new(RedisClient::new().await.unwrap()));
        let repo = TokenRepository::instance();
        let user_id = format!("test-{}", uuid::Uuid::new_v4());

        repo.store_refresh_token(&user_id, "alice", "google", "refresh-abc", 120).await.unwrap();

        assert!(repo.consume_refresh_token(&user_id, "stale").await.unwrap().is_none());

        let (first, second) = futures_util::join!(
            repo.consume_refresh_token(&user_id, "refresh-abc"),
            repo.consume_refresh_token(&user_id, "refresh-abc"),
        );
        let consumed = [first.unwrap(), second.unwrap()].into_iter().flatten().count();
        assert_eq!(consumed, 1);
    }
}
