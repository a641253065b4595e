//! JWT 인증 토큰 구조체 및 페어링 된 세트
//!
//! 로그인 직후 발급하는 액세스/리프레시 토큰의 클레임과 응답 형식입니다.
use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::social_provider::SocialProvider;

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 토큰의 클레임(Payload) 구조체
///
/// ## 클레임 구성
///
/// - `sub`: 사용자 ID (ObjectId hex)
/// - `role`: `customer` / `admin`
/// - `provider`: 이번 로그인에 사용한 소셜 프로바이더
/// - `token_type`: 액세스/리프레시 구분
/// - `iat`, `exp`: 발급·만료 시각 (Unix timestamp)
/// - `jti`: 토큰 고유 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    pub provider: SocialProvider,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// JWT 토큰 쌍 구조체
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료 시간 (초)
    pub expires_in: i64,
    pub token_type: String,
}
