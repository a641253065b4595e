//! # Authentication Configuration Module
//!
//! 소셜 프로바이더, JWT 토큰, OAuth state, 동의 페이지 설정을 관리합니다.
//!
//! ## 필수 환경 변수
//!
//! ```bash
//! # Google
//! export GOOGLE_CLIENT_ID="xxxx.apps.googleusercontent.com"
//! export GOOGLE_CLIENT_SECRET="..."          # 코드 플로우 사용 시
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/api/v1/auth/google/callback"
//!
//! # Kakao
//! export KAKAO_CLIENT_ID="REST API 키"
//! export KAKAO_CLIENT_SECRET="..."           # 선택
//! export KAKAO_REDIRECT_URI="http://localhost:8080/api/v1/auth/kakao/callback"
//!
//! # Naver
//! export NAVER_CLIENT_ID="..."
//! export NAVER_CLIENT_SECRET="..."
//! export NAVER_REDIRECT_URI="http://localhost:8080/api/v1/auth/naver/callback"
//!
//! # Apple
//! export APPLE_CLIENT_ID="com.example.storefront.web"   # Services ID
//! export APPLE_TEAM_ID="..."
//! export APPLE_KEY_ID="..."
//! export APPLE_PRIVATE_KEY_PATH="./AuthKey_XXXX.p8"     # 또는 APPLE_PRIVATE_KEY
//! export APPLE_REDIRECT_URI="https://example.com/api/v1/auth/apple/callback"
//! export APPLE_JWKS_CACHE_TTL_SECONDS=3600                # 선택, 공개 키 캐시
//! ```
//!
//! 필수 값이 없으면 해당 프로바이더 요청만 `AppError::InternalError`로 실패하고
//! 서버는 계속 동작합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{GoogleOAuthConfig, JwtConfig};
//!
//! let client_id = GoogleOAuthConfig::client_id()?;
//! let expiration = JwtConfig::expiration_hours();
//! ```

use std::env;
use crate::errors::{AppError, AppResult};

/// 필수 환경 변수를 읽습니다. 비어 있으면 설정 누락으로 간주합니다.
pub fn required_env(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::InternalError(format!("{} must be set", key))),
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    pub fn client_id() -> AppResult<String> {
        required_env("GOOGLE_CLIENT_ID")
    }

    pub fn client_secret() -> AppResult<String> {
        required_env("GOOGLE_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> AppResult<String> {
        required_env("GOOGLE_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env::var("GOOGLE_AUTH_URI")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string())
    }

    pub fn token_uri() -> String {
        env::var("GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string())
    }

    /// ID 토큰 검증 엔드포인트
    pub fn tokeninfo_uri() -> String {
        env::var("GOOGLE_TOKENINFO_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/tokeninfo".to_string())
    }
}

pub struct KakaoOAuthConfig;

impl KakaoOAuthConfig {
    pub fn client_id() -> AppResult<String> {
        required_env("KAKAO_CLIENT_ID")
    }

    /// 카카오 앱 설정에서 Client Secret을 활성화한 경우에만 사용합니다.
    pub fn client_secret() -> Option<String> {
        optional_env("KAKAO_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> AppResult<String> {
        required_env("KAKAO_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env::var("KAKAO_AUTH_URI")
            .unwrap_or_else(|_| "https://kauth.kakao.com/oauth/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env::var("KAKAO_TOKEN_URI")
            .unwrap_or_else(|_| "https://kauth.kakao.com/oauth/token".to_string())
    }

    pub fn user_info_uri() -> String {
        env::var("KAKAO_USER_INFO_URI")
            .unwrap_or_else(|_| "https://kapi.kakao.com/v2/user/me".to_string())
    }
}

pub struct NaverOAuthConfig;

impl NaverOAuthConfig {
    pub fn client_id() -> AppResult<String> {
        required_env("NAVER_CLIENT_ID")
    }

    pub fn client_secret() -> AppResult<String> {
        required_env("NAVER_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> AppResult<String> {
        required_env("NAVER_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env::var("NAVER_AUTH_URI")
            .unwrap_or_else(|_| "https://nid.naver.com/oauth2.0/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env::var("NAVER_TOKEN_URI")
            .unwrap_or_else(|_| "https://nid.naver.com/oauth2.0/token".to_string())
    }

    pub fn user_info_uri() -> String {
        env::var("NAVER_USER_INFO_URI")
            .unwrap_or_else(|_| "https://openapi.naver.com/v1/nid/me".to_string())
    }
}

pub struct AppleOAuthConfig;

impl AppleOAuthConfig {
    pub const ISSUER: &'static str = "https://appleid.apple.com";

    pub fn client_id() -> AppResult<String> {
        required_env("APPLE_CLIENT_ID")
    }

    pub fn team_id() -> AppResult<String> {
        required_env("APPLE_TEAM_ID")
    }

    pub fn key_id() -> AppResult<String> {
        required_env("APPLE_KEY_ID")
    }

    pub fn redirect_uri() -> AppResult<String> {
        required_env("APPLE_REDIRECT_URI")
    }

    /// `.p8` 개인 키 PEM. `APPLE_PRIVATE_KEY`가 우선이고 없으면 파일 경로에서 읽습니다.
    pub fn private_key() -> AppResult<String> {
        if let Some(pem) = optional_env("APPLE_PRIVATE_KEY") {
            return Ok(pem.replace("\\n", "\n"));
        }

        let path = required_env("APPLE_PRIVATE_KEY_PATH")?;
        std::fs::read_to_string(&path)
            .map_err(|e| AppError::InternalError(format!("Apple 개인 키 읽기 실패 ({}): {}", path, e)))
    }

    pub fn auth_uri() -> String {
        env::var("APPLE_AUTH_URI")
            .unwrap_or_else(|_| "https://appleid.apple.com/auth/authorize".to_string())
    }

    pub fn token_uri() -> String {
        env::var("APPLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://appleid.apple.com/auth/token".to_string())
    }

    pub fn keys_uri() -> String {
        env::var("APPLE_KEYS_URI")
            .unwrap_or_else(|_| "https://appleid.apple.com/auth/keys".to_string())
    }

    /// 공개 키 캐시 유지 시간 (기본 1시간)
    pub fn jwks_cache_ttl_seconds() -> u64 {
        env::var("APPLE_JWKS_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600)
    }
}

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24)
    }

    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7)
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    pub fn session_timeout_minutes() -> i64 {
        env::var("OAUTH_SESSION_TIMEOUT_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }
}

/// 로그인 이후 이동 경로 설정
pub struct ConsentConfig;

impl ConsentConfig {
    /// 필수 약관에 동의하지 않은 사용자를 보낼 페이지
    pub fn consent_page_path() -> String {
        env::var("CONSENT_PAGE_PATH").unwrap_or_else(|_| "/users/consent/".to_string())
    }

    /// `next`가 없거나 안전하지 않을 때 이동할 경로
    pub fn default_redirect_path() -> String {
        env::var("DEFAULT_REDIRECT_PATH").unwrap_or_else(|_| "/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_env_missing_is_internal_error() {
        let result = required_env("STOREFRONT_AUTH_TEST_DEFINITELY_UNSET");
        assert!(matches!(result, Err(AppError::InternalError(msg)) if msg.contains("must be set")));
    }

    #[test]
    fn test_provider_endpoint_defaults() {
        if env::var("KAKAO_TOKEN_URI").is_err() {
            assert_eq!(KakaoOAuthConfig::token_uri(), "https://kauth.kakao.com/oauth/token");
        }
        if env::var("NAVER_USER_INFO_URI").is_err() {
            assert_eq!(NaverOAuthConfig::user_info_uri(), "https://openapi.naver.com/v1/nid/me");
        }
        if env::var("APPLE_KEYS_URI").is_err() {
            assert_eq!(AppleOAuthConfig::keys_uri(), "https://appleid.apple.com/auth/keys");
        }
        if env::var("APPLE_JWKS_CACHE_TTL_SECONDS").is_err() {
            assert_eq!(AppleOAuthConfig::jwks_cache_ttl_seconds(), 3600);
        }
    }

    #[test]
    fn test_consent_defaults() {
        if env::var("CONSENT_PAGE_PATH").is_err() {
            assert_eq!(ConsentConfig::consent_page_path(), "/users/consent/");
        }
        if env::var("DEFAULT_REDIRECT_PATH").is_err() {
            assert_eq!(ConsentConfig::default_redirect_path(), "/");
        }
    }
}
