//! # 세션 토큰 서비스
//!
//! 소셜 로그인이 끝난 사용자에게 HS256 JWT 액세스/리프레시 토큰을 발급합니다.
//! 리프레시 토큰은 `TokenRepository`에 사용자당 하나만 보관하므로,
//! 새로 로그인하거나 갱신하면 이전 리프레시 토큰은 더 이상 쓸 수 없습니다.

use std::sync::Arc;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    domain::entities::users::user::User,
    domain::models::oauth::social_provider::SocialProvider,
    domain::models::token::token::{TokenClaims, TokenPair, TokenType},
    repositories::tokens::token_repository::TokenRepository,
};
use crate::errors::{AppError, AppResult, ErrorContext};

pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// 리다이렉트 방식 로그인에서 토큰을 전달하는 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[service(name = "token")]
pub struct TokenService {
    token_repo: Arc<TokenRepository>,
}

/// 클레임을 만들어 서명합니다.
pub fn sign_token(
    user: &User,
    provider: SocialProvider,
    token_type: TokenType,
    lifetime: Duration,
    secret: &str,
) -> AppResult<String> {
    let now = Utc::now();

    let claims = TokenClaims {
        sub: user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?,
        role: user.role.as_str().to_string(),
        provider,
        token_type,
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .context("JWT 토큰 생성 실패")
}

/// 서명과 만료를 확인하고, 용도가 다른 토큰은 거부합니다.
pub fn verify_signed_token(token: &str, expected: TokenType, secret: &str) -> AppResult<TokenClaims> {
    let claims = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|token_data| token_data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("토큰이 만료되었습니다".to_string())
        }
        _ => AppError::Unauthorized("유효하지 않은 토큰입니다".to_string()),
    })?;

    if claims.token_type != expected {
        return Err(AppError::Unauthorized("토큰 용도가 올바르지 않습니다".to_string()));
    }

    Ok(claims)
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 부분만 꺼냅니다.
pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("유효하지 않은 인증 헤더 형식입니다".to_string()))
}

impl TokenService {
    pub fn generate_token_pair(&self, user: &User, provider: SocialProvider) -> AppResult<TokenPair> {
        let secret = JwtConfig::secret();

        let access_token = sign_token(
            user,
            provider,
            TokenType::Access,
            Duration::hours(JwtConfig::expiration_hours()),
            &secret,
        )?;
        let refresh_token = sign_token(
            user,
            provider,
            TokenType::Refresh,
            Duration::days(JwtConfig::refresh_expiration_days()),
            &secret,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: JwtConfig::expiration_hours() * 3600,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        })
    }

    /// 토큰 쌍을 발급하고 리프레시 토큰을 저장합니다.
    pub async fn issue_session(&self, user: &User, provider: SocialProvider) -> AppResult<TokenPair> {
        let pair = self.generate_token_pair(user, provider)?;
        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?;

        let ttl_seconds = (JwtConfig::refresh_expiration_days() * 24 * 3600).max(0) as u64;
        self.token_repo
            .store_refresh_token(&user_id, &user.username, provider.as_str(), &pair.refresh_token, ttl_seconds)
            .await?;

        Ok(pair)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<TokenClaims> {
        verify_signed_token(token, TokenType::Access, &JwtConfig::secret())
    }

    /// 서명을 확인하고 저장된 최신 리프레시 토큰을 소모합니다.
    ///
    /// 같은 토큰으로 두 번째 요청은 401입니다. 호출자는 곧바로 새 세션을 발급해야 합니다.
    pub async fn consume_refresh_token(&self, token: &str) -> AppResult<TokenClaims> {
        let claims = verify_signed_token(token, TokenType::Refresh, &JwtConfig::secret())?;

        self.token_repo
            .consume_refresh_token(&claims.sub, token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("만료되었거나 폐기된 리프레시 토큰입니다".to_string()))?;

        Ok(claims)
    }

    pub async fn revoke(&self, user_id: &str) -> AppResult<()> {
        self.token_repo.delete_refresh_token(user_id).await
    }
}
