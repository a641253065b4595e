//! 소셜 프로바이더 호출용 HTTP 공통 코드
//!
//! 모든 외부 호출은 타임아웃이 설정된 클라이언트 하나를 공유합니다.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use crate::config::HttpClientConfig;
use crate::errors::{AppError, AppResult};

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(HttpClientConfig::connect_timeout())
        .timeout(HttpClientConfig::request_timeout())
        .build()
        .unwrap_or_else(|e| {
            log::error!("HTTP 클라이언트 생성 실패, 기본 설정 사용: {}", e);
            reqwest::Client::new()
        })
});

/// 인가 엔드포인트 URL에 쿼리 파라미터를 붙입니다.
pub fn build_login_url(base: &str, params: &[(&str, &str)]) -> String {
    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query_string)
}

/// 응답을 JSON으로 읽습니다.
///
/// * 전송 실패, 본문 파싱 실패 → `ExternalServiceError`
/// * 2xx가 아닌 응답 → `AuthenticationError` (본문은 로그에만 남김)
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Result<reqwest::Response>,
    what: &str,
) -> AppResult<T> {
    let response = response
        .map_err(|e| AppError::ExternalServiceError(format!("{} 요청 실패: {}", what, e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        log::warn!("{} 실패 ({}): {}", what, status, error_text);
        return Err(AppError::AuthenticationError(format!(
            "{} 실패 (HTTP {})",
            what,
            status.as_u16()
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::ExternalServiceError(format!("{} 응답 파싱 실패: {}", what, e)))
}
