//! # OAuth state 저장소
//!
//! 리다이렉트 방식 로그인의 CSRF 방지용 `state`를 발급하고 한 번만 소비합니다.
//! 로그인 후 이동할 `next`도 state와 함께 저장해 콜백에서 꺼내 씁니다.
//!
//! | 키 | 값 | TTL |
//! |----|----|-----|
//! | `oauth_state:{state}` | `{provider, next, issued_at}` | `OAUTH_SESSION_TIMEOUT_MINUTES` |

use std::sync::Arc;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use singleton_macro::repository;
use crate::caching::redis::RedisClient;
use crate::config::OAuthConfig;
use crate::core::registry::Repository;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::errors::{AppError, AppResult};

#[repository(name = "oauth_state", collection = "oauth_states")]
pub struct OAuthStateRepository {
    redis: Arc<RedisClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthStateEntry {
    pub provider: SocialProvider,
    pub next: Option<String>,
    pub issued_at: i64,
}

impl OAuthStateEntry {
    /// 다른 프로바이더 콜백으로 들어온 state는 거부합니다.
    pub fn ensure_provider(self, provider: SocialProvider) -> AppResult<Self> {
        if self.provider == provider {
            Ok(self)
        } else {
            Err(AppError::AuthenticationError(
                "state가 요청한 로그인 방식과 일치하지 않습니다".to_string(),
            ))
        }
    }
}

pub fn oauth_state_key(state: &str) -> String {
    format!("oauth_state:{}", state)
}

/// 추측할 수 없는 state 값 (URL-safe base64, 43자)
pub fn generate_state(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

impl OAuthStateRepository {
    pub async fn issue(&self, provider: SocialProvider, next: Option<String>) -> AppResult<String> {
        let state = generate_state(&OAuthConfig::state_secret());
        let ttl_seconds = (OAuthConfig::session_timeout_minutes().max(1) * 60) as u64;

        let entry = OAuthStateEntry {
            provider,
            next,
            issued_at: Utc::now().timestamp(),
        };

        self.redis
            .set_with_expiry(&oauth_state_key(&state), &entry, ttl_seconds)
            .await?;

        log::debug!("{} OAuth state 발급 (ttl {}초)", provider, ttl_seconds);
        Ok(state)
    }

    /// state를 꺼내면서 삭제합니다. 같은 state로 두 번 들어오면 두 번째는 실패합니다.
    pub async fn consume(&self, provider: SocialProvider, state: &str) -> AppResult<OAuthStateEntry> {
        let entry = self.redis
            .take::<OAuthStateEntry>(&oauth_state_key(state))
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("유효하지 않거나 만료된 state입니다".to_string())
            })?;

        entry.ensure_provider(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_states_are_unique_and_url_safe() {
        let a = generate_state("secret");
        let b = generate_state("secret");

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_state_key() {
        assert_eq!(oauth_state_key("abc"), "oauth_state:abc");
    }

    #[test]
    fn test_provider_mismatch_is_rejected() {
        let entry = OAuthStateEntry {
            provider: SocialProvider::Naver,
            next: Some("/cart/".to_string()),
            issued_at: 0,
        };

        assert!(entry.clone().ensure_provider(SocialProvider::Naver).is_ok());
        assert!(matches!(
            entry.ensure_provider(SocialProvider::Kakao),
            Err(AppError::AuthenticationError(_))
        ));
    }
}
