//! 인가 코드 교환 결과 (Google, 카카오, 네이버, Apple 공통)

use serde::Deserialize;
use crate::errors::{AppError, AppResult};

/// 프로바이더 토큰 엔드포인트 응답.
///
/// 네이버는 오류도 HTTP 200과 `error` 필드로 돌려주므로 두 경우를 모두 담습니다.
#[derive(Debug, Deserialize)]
pub struct ProviderTokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub id_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl ProviderTokenResponse {
    fn check_error(&self) -> AppResult<()> {
        if let Some(error) = &self.error {
            return Err(AppError::AuthenticationError(format!(
                "토큰 교환 실패: {}",
                self.error_description.as_deref().unwrap_or(error)
            )));
        }
        Ok(())
    }

    pub fn into_access_token(self) -> AppResult<String> {
        self.check_error()?;
        self.access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AppError::AuthenticationError("액세스 토큰을 받지 못했습니다".to_string()))
    }

    pub fn into_id_token(self) -> AppResult<String> {
        self.check_error()?;
        self.id_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AppError::AuthenticationError("ID 토큰을 받지 못했습니다".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_present() {
        let response: ProviderTokenResponse = serde_json::from_str(
            r#"{"token_type": "bearer", "access_token": "abc", "expires_in": 21599, "refresh_token": "r"}"#,
        )
        .unwrap();
        assert_eq!(response.into_access_token().unwrap(), "abc");
    }

    #[test]
    fn test_missing_access_token_is_authentication_error() {
        let response: ProviderTokenResponse =
            serde_json::from_str(r#"{"token_type": "bearer"}"#).unwrap();
        assert!(matches!(
            response.into_access_token(),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_error_body_wins() {
        let response: ProviderTokenResponse = serde_json::from_str(
            r#"{"error": "invalid_request", "error_description": "no valid data in session"}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_id_token(),
            Err(AppError::AuthenticationError(msg)) if msg.contains("no valid data")
        ));
    }
}
