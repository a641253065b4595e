//! 인증 요청관련 DTO
//!
//! 소셜 로그인 버튼, OAuth 콜백, 토큰 갱신 요청을 매핑합니다.
use serde::Deserialize;
use validator::Validate;
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::deserialize_optional_string;

/// Google Identity Services가 넘겨준 ID 토큰
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1, message = "Google 인증 정보가 필요합니다"))]
    pub credential: String,
}

/// 카카오 JS SDK가 발급한 액세스 토큰
#[derive(Debug, Deserialize, Validate)]
pub struct KakaoLoginRequest {
    #[validate(length(min = 1, message = "카카오 액세스 토큰이 필요합니다"))]
    pub access_token: String,
}

/// 로그인 후 이동할 경로 (`?next=`)
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub next: Option<String>,
}

/// OAuth 콜백 쿼리 파라미터 구조체
///
/// 사용자가 동의를 거부하면 `code` 없이 `error`만 옵니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl OAuthCallbackQuery {
    pub fn into_code_and_state(self) -> AppResult<(String, String)> {
        callback_parts(self.code, self.state, self.error, self.error_description)
    }
}

/// Apple `response_mode=form_post` 콜백 본문
#[derive(Debug, Deserialize)]
pub struct AppleCallbackForm {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
    /// 최초 로그인 때만 오는 이름/이메일 JSON
    pub user: Option<String>,
    pub error: Option<String>,
}

impl AppleCallbackForm {
    pub fn into_parts(self) -> AppResult<(String, String, Option<String>)> {
        let user = self.user;
        let (code, state) = callback_parts(self.code, self.state, self.error, None)?;
        Ok((code, state, user))
    }
}

fn callback_parts(
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
) -> AppResult<(String, String)> {
    if let Some(error) = error {
        return Err(AppError::AuthenticationError(
            error_description.unwrap_or(error),
        ));
    }

    let code = code.ok_or_else(|| {
        AppError::AuthenticationError("인가 코드가 없습니다".to_string())
    })?;
    let state = state.ok_or_else(|| {
        AppError::AuthenticationError("state 값이 없습니다".to_string())
    })?;

    Ok((code, state))
}

/// 리프레시 토큰 요청 구조체 (쿠키가 없을 때 사용)
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}
