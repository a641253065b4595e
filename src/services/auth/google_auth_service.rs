//! # Google 로그인 검증
//!
//! 두 가지 진입점을 지원합니다.
//!
//! - **ID 토큰**: Google Identity Services 버튼이 넘겨준 `credential`
//! - **인가 코드**: 로그인 URL → 콜백 → 토큰 교환 → `id_token`
//!
//! 어느 쪽이든 ID 토큰은 tokeninfo 엔드포인트로 검증하고
//! 발급자, 대상, 만료, 이메일 인증 여부를 직접 확인합니다.

use chrono::Utc;
use singleton_macro::service;
use crate::config::GoogleOAuthConfig;
use crate::domain::models::oauth::google::GoogleIdTokenClaims;
use crate::domain::models::oauth::provider_token::ProviderTokenResponse;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::AppResult;
use crate::services::auth::oauth_http::{build_login_url, read_json, HTTP_CLIENT};

#[service(name = "google_auth")]
pub struct GoogleAuthService {}

impl GoogleAuthService {
    pub fn login_url(&self, state: &str) -> AppResult<String> {
        let client_id = GoogleOAuthConfig::client_id()?;
        let redirect_uri = GoogleOAuthConfig::redirect_uri()?;

        Ok(build_login_url(
            &GoogleOAuthConfig::auth_uri(),
            &[
                ("client_id", client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", "openid email profile"),
                ("response_type", "code"),
                ("prompt", "select_account"),
                ("state", state),
            ],
        ))
    }

    pub async fn verify_id_token(&self, id_token: &str) -> AppResult<VerifiedIdentity> {
        let client_id = GoogleOAuthConfig::client_id()?;

        let response = HTTP_CLIENT
            .get(GoogleOAuthConfig::tokeninfo_uri())
            .query(&[("id_token", id_token)])
            .send()
            .await;
        let claims: GoogleIdTokenClaims = read_json(response, "Google ID 토큰 검증").await?;

        claims.validate(&client_id, Utc::now().timestamp())?;
        Ok(claims.into_identity())
    }

    pub async fn verify_code(&self, code: &str) -> AppResult<VerifiedIdentity> {
        let client_id = GoogleOAuthConfig::client_id()?;
        let client_secret = GoogleOAuthConfig::client_secret()?;
        let redirect_uri = GoogleOAuthConfig::redirect_uri()?;

        let params = [
            ("code", code),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = HTTP_CLIENT
            .post(GoogleOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await;
        let token: ProviderTokenResponse = read_json(response, "Google 토큰 교환").await?;

        self.verify_id_token(&token.into_id_token()?).await
    }
}
