//! # 카카오 로그인 검증
//!
//! JS SDK가 발급한 액세스 토큰을 직접 받거나, 인가 코드를 교환해 액세스 토큰을 얻은 뒤
//! `/v2/user/me`로 사용자 정보를 조회합니다.

use singleton_macro::service;
use crate::config::KakaoOAuthConfig;
use crate::domain::models::oauth::kakao::KakaoUserInfo;
use crate::domain::models::oauth::provider_token::ProviderTokenResponse;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::AppResult;
use crate::services::auth::oauth_http::{build_login_url, read_json, HTTP_CLIENT};

#[service(name = "kakao_auth")]
pub struct KakaoAuthService {}

impl KakaoAuthService {
    pub fn login_url(&self, state: &str) -> AppResult<String> {
        let client_id = KakaoOAuthConfig::client_id()?;
        let redirect_uri = KakaoOAuthConfig::redirect_uri()?;

        Ok(build_login_url(
            &KakaoOAuthConfig::auth_uri(),
            &[
                ("client_id", client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("state", state),
            ],
        ))
    }

    pub async fn verify_access_token(&self, access_token: &str) -> AppResult<VerifiedIdentity> {
        let response = HTTP_CLIENT
            .get(KakaoOAuthConfig::user_info_uri())
            .bearer_auth(access_token)
            .send()
            .await;
        let info: KakaoUserInfo = read_json(response, "카카오 사용자 정보 조회").await?;

        Ok(info.into_identity())
    }

    pub async fn verify_code(&self, code: &str) -> AppResult<VerifiedIdentity> {
        let client_id = KakaoOAuthConfig::client_id()?;
        let redirect_uri = KakaoOAuthConfig::redirect_uri()?;

        let mut params = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("code", code.to_string()),
        ];
        if let Some(secret) = KakaoOAuthConfig::client_secret() {
            params.push(("client_secret", secret));
        }

        let response = HTTP_CLIENT
            .post(KakaoOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await;
        let token: ProviderTokenResponse = read_json(response, "카카오 토큰 교환").await?;

        self.verify_access_token(&token.into_access_token()?).await
    }
}
