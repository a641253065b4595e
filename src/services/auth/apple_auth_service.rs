//! # Sign in with Apple 검증
//!
//! Apple은 다른 프로바이더와 두 가지가 다릅니다.
//!
//! - 클라이언트 시크릿이 고정 문자열이 아니라, `.p8` 키로 서명한 ES256 JWT입니다.
//! - 사용자 정보 API가 없습니다. 토큰 교환 결과의 `id_token`을 Apple 공개 키(JWKS)로
//!   직접 검증하고, 이름은 최초 로그인 때 form으로 한 번만 전달됩니다.
//!
//! 공개 키는 `apple_jwks:{kid}`로 Redis에 캐시합니다. 모르는 `kid`가 오면
//! (키 교체) JWKS를 다시 받아 캐시를 채웁니다.

use std::sync::Arc;
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::caching::redis::RedisClient;
use crate::config::AppleOAuthConfig;
use crate::domain::models::oauth::apple::{
    AppleClientSecretClaims, AppleIdTokenClaims, AppleJwk, AppleJwks, AppleUserPayload,
};
use crate::domain::models::oauth::provider_token::ProviderTokenResponse;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::services::auth::oauth_http::{build_login_url, read_json, HTTP_CLIENT};

#[service(name = "apple_auth")]
pub struct AppleAuthService {
    cache: Arc<RedisClient>,
}

pub fn jwk_cache_key(kid: &str) -> String {
    format!("apple_jwks:{}", kid)
}

/// 서명되지 않은 헤더에서 `kid`만 꺼냅니다. 검증은 [`verify_apple_id_token`]이 합니다.
pub fn id_token_kid(id_token: &str) -> AppResult<String> {
    let header = decode_header(id_token)
        .map_err(|e| AppError::AuthenticationError(format!("Apple ID 토큰 헤더 오류: {}", e)))?;

    header.kid.ok_or_else(|| {
        AppError::AuthenticationError("Apple ID 토큰에 kid가 없습니다".to_string())
    })
}

/// ID 토큰 헤더의 `kid`에 맞는 공개 키를 찾습니다.
pub fn decoding_key_for(id_token: &str, jwks: &AppleJwks) -> AppResult<DecodingKey> {
    let kid = id_token_kid(id_token)?;

    let jwk = jwks.find(&kid).ok_or_else(|| {
        AppError::AuthenticationError(format!("알 수 없는 Apple 서명 키입니다: {}", kid))
    })?;

    DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| AppError::AuthenticationError(format!("Apple 공개 키 오류: {}", e)))
}

/// 서명, 대상(client id), 발급자, 만료를 검증합니다.
pub fn verify_apple_id_token(
    id_token: &str,
    jwks: &AppleJwks,
    client_id: &str,
) -> AppResult<AppleIdTokenClaims> {
    let key = decoding_key_for(id_token, jwks)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[client_id]);
    validation.set_issuer(&[AppleOAuthConfig::ISSUER]);

    decode::<AppleIdTokenClaims>(id_token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::AuthenticationError(format!("Apple ID 토큰 검증 실패: {}", e)))
}

impl AppleAuthService {
    pub fn login_url(&self, state: &str) -> AppResult<String> {
        let client_id = AppleOAuthConfig::client_id()?;
        let redirect_uri = AppleOAuthConfig::redirect_uri()?;

        Ok(build_login_url(
            &AppleOAuthConfig::auth_uri(),
            &[
                ("client_id", client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("response_mode", "form_post"),
                ("scope", "name email"),
                ("state", state),
            ],
        ))
    }

    /// 토큰 엔드포인트 호출용 클라이언트 시크릿 (10분 유효)
    pub fn client_secret(&self) -> AppResult<String> {
        let claims = AppleClientSecretClaims::new(
            &AppleOAuthConfig::team_id()?,
            &AppleOAuthConfig::client_id()?,
            AppleOAuthConfig::ISSUER,
            Utc::now().timestamp(),
        );

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(AppleOAuthConfig::key_id()?);

        let private_key = AppleOAuthConfig::private_key()?;
        let encoding_key = EncodingKey::from_ec_pem(private_key.as_bytes())
            .context("Apple 개인 키 형식 오류")?;

        encode(&header, &claims, &encoding_key).context("Apple 클라이언트 시크릿 생성 실패")
    }

    async fn fetch_jwks(&self) -> AppResult<AppleJwks> {
        let response = HTTP_CLIENT.get(AppleOAuthConfig::keys_uri()).send().await;
        read_json(response, "Apple 공개 키 조회").await
    }

    /// 캐시에 있으면 그 키만, 없으면 JWKS 전체를 받아 키별로 캐시합니다.
    ///
    /// 캐시 오류는 로그만 남기고 원격 조회로 넘어갑니다.
    async fn signing_keys(&self, kid: &str) -> AppResult<AppleJwks> {
        match self.cache.get::<AppleJwk>(&jwk_cache_key(kid)).await {
            Ok(Some(jwk)) => return Ok(AppleJwks { keys: vec![jwk] }),
            Ok(None) => {}
            Err(e) => log::warn!("Apple 공개 키 캐시 조회 실패: {}", e),
        }

        let jwks = self.fetch_jwks().await?;
        let ttl = AppleOAuthConfig::jwks_cache_ttl_seconds();
        for jwk in &jwks.keys {
            if let Err(e) = self.cache.set_with_expiry(&jwk_cache_key(&jwk.kid), jwk, ttl).await {
                log::warn!("Apple 공개 키 캐시 저장 실패 (kid: {}): {}", jwk.kid, e);
            }
        }

        log::debug!("Apple 공개 키 {}개 갱신", jwks.keys.len());
        Ok(jwks)
    }

    pub async fn verify_code(&self, code: &str, user_json: Option<&str>) -> AppResult<VerifiedIdentity> {
        let client_id = AppleOAuthConfig::client_id()?;
        let redirect_uri = AppleOAuthConfig::redirect_uri()?;
        let client_secret = self.client_secret()?;

        let params = [
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        let response = HTTP_CLIENT
            .post(AppleOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await;
        let token: ProviderTokenResponse = read_json(response, "Apple 토큰 교환").await?;
        let id_token = token.into_id_token()?;

        let jwks = self.signing_keys(&id_token_kid(&id_token)?).await?;
        let claims = verify_apple_id_token(&id_token, &jwks, &client_id)?;

        Ok(claims.into_identity(&AppleUserPayload::parse(user_json)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn jwks() -> AppleJwks {
        serde_json::from_str(
            r#"{"keys": [{"kty": "RSA", "kid": "W6WcOKB", "use": "sig", "alg": "RS256", "n": "sXch", "e": "AQAB"}]}"#,
        )
        .unwrap()
    }

    fn token_with_header(header: &str) -> String {
        format!(
            "{}.{}.c2ln",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(r#"{"sub":"001.abc"}"#)
        )
    }

    #[test]
    fn test_unknown_kid_is_authentication_error() {
        let token = token_with_header(r#"{"alg":"RS256","kid":"unknown"}"#);
        assert!(matches!(
            decoding_key_for(&token, &jwks()),
            Err(AppError::AuthenticationError(msg)) if msg.contains("unknown")
        ));
    }

    #[test]
    fn test_missing_kid_is_authentication_error() {
        let token = token_with_header(r#"{"alg":"RS256"}"#);
        assert!(matches!(
            decoding_key_for(&token, &jwks()),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_kid_is_read_from_header() {
        let token = token_with_header(r#"{"alg":"RS256","kid":"W6WcOKB"}"#);
        assert_eq!(id_token_kid(&token).unwrap(), "W6WcOKB");
        assert_eq!(jwk_cache_key("W6WcOKB"), "apple_jwks:W6WcOKB");
    }

    #[test]
    fn test_cached_key_round_trips_and_resolves_kid() {
        let cached = jwks().keys[0].clone();
        let restored: AppleJwk = serde_json::from_str(&serde_json::to_string(&cached).unwrap()).unwrap();
        assert_eq!(restored, cached);

        let single = AppleJwks { keys: vec![restored] };
        let token = token_with_header(r#"{"alg":"RS256","kid":"W6WcOKB"}"#);
        assert!(decoding_key_for(&token, &single).is_ok());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_apple_id_token("not-a-jwt", &jwks(), "com.storefront.web").is_err());
    }
}
