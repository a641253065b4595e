//! # 네이버 로그인 검증
//!
//! 인가 코드와 state를 함께 보내 액세스 토큰을 받고, 회원 프로필 API를 조회합니다.

use singleton_macro::service;
use crate::config::NaverOAuthConfig;
use crate::domain::models::oauth::naver::NaverProfileResponse;
use crate::domain::models::oauth::provider_token::ProviderTokenResponse;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::AppResult;
use crate::services::auth::oauth_http::{build_login_url, read_json, HTTP_CLIENT};

#[service(name = "naver_auth")]
pub struct NaverAuthService {}

impl NaverAuthService {
    pub fn login_url(&self, state: &str) -> AppResult<String> {
        let client_id = NaverOAuthConfig::client_id()?;
        let redirect_uri = NaverOAuthConfig::redirect_uri()?;

        Ok(build_login_url(
            &NaverOAuthConfig::auth_uri(),
            &[
                ("response_type", "code"),
                ("client_id", client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("state", state),
            ],
        ))
    }

    pub async fn verify_code(&self, code: &str, state: &str) -> AppResult<VerifiedIdentity> {
        let client_id = NaverOAuthConfig::client_id()?;
        let client_secret = NaverOAuthConfig::client_secret()?;

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code),
            ("state", state),
        ];

        let response = HTTP_CLIENT
            .post(NaverOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await;
        let token: ProviderTokenResponse = read_json(response, "네이버 토큰 교환").await?;
        let access_token = token.into_access_token()?;

        let response = HTTP_CLIENT
            .get(NaverOAuthConfig::user_info_uri())
            .bearer_auth(&access_token)
            .send()
            .await;
        let profile: NaverProfileResponse = read_json(response, "네이버 프로필 조회").await?;

        profile.into_identity()
    }
}
