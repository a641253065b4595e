//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 모든 핸들러가
//! 동일한 `{"success": false, "message": ...}` 형태의 응답을 반환하도록 합니다.
//!
//! 에러는 세 부류로 나뉩니다.
//!
//! | 부류 | 변형 | 상태 코드 |
//! |------|------|-----------|
//! | 소셜 인증 실패 | `AuthenticationError`, `ExternalServiceError` | 400 |
//! | 입력/식별 정보 누락 | `ValidationError` | 400 |
//! | 로컬 저장소 장애 | `DatabaseError`, `RedisError`, `InternalError`, `TransactionConflict` | 500 |
//!
//! 500 계열은 상세 원인을 로그로만 남기고 클라이언트에는 일반 메시지를 보냅니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn verify(token: &str) -> Result<VerifiedIdentity, AppError> {
//!     if token.is_empty() {
//!         return Err(AppError::ValidationError("토큰이 필요합니다".to_string()));
//!     }
//!     google_verifier.verify(token).await
//! }
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 클라이언트에 노출되는 서버 오류 메시지
pub const GENERIC_SERVER_ERROR_MESSAGE: &str = "서버 오류가 발생했습니다.";

/// 소셜 인증 실패 메시지 접두어
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "소셜 로그인 인증에 실패했습니다";

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 또는 필수 식별 정보 누락 (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 프로바이더 토큰 검증 실패 (400)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 세션 토큰 누락 또는 만료 (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 부족 (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 프로바이더 API 호출 실패 (400)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 트랜잭션 쓰기 충돌. 재시도 대상이며 재시도가 소진되면 500으로 응답합니다.
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// 내부 서버 에러 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 재시도로 해소될 수 있는 에러인지 여부
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransactionConflict(_))
    }

    /// 클라이언트에 보낼 메시지
    pub fn client_message(&self) -> String {
        match self {
            AppError::AuthenticationError(reason) | AppError::ExternalServiceError(reason) => {
                format!("{}: {}", AUTHENTICATION_FAILED_MESSAGE, reason)
            }
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::Unauthorized(msg)
            | AppError::AuthorizationError(msg) => msg.clone(),
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::TransactionConflict(_)
            | AppError::InternalError(_) => GENERIC_SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::AuthenticationError(_)
            | AppError::ExternalServiceError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 서버 오류는 원인을 `error` 레벨로 기록하고 일반 메시지만 응답합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("요청 처리 중 서버 오류: {}", self);
        } else {
            log::warn!("요청 거부 ({}): {}", status.as_u16(), self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "message": self.client_message(),
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;

    fn body_json(error: &AppError) -> serde_json::Value {
        let bytes = error.error_response().into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("이메일 정보가 없습니다".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_failure_is_bad_request_with_reason() {
        let error = AppError::AuthenticationError("잘못된 토큰 발급자입니다".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);

        let body = body_json(&error);
        assert_eq!(body["success"], false);
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with(AUTHENTICATION_FAILED_MESSAGE));
        assert!(message.contains("잘못된 토큰 발급자입니다"));
    }

    #[test]
    fn test_external_service_error_is_bad_request() {
        let error = AppError::ExternalServiceError("카카오 사용자 정보 요청 실패".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_errors_hide_detail() {
        for error in [
            AppError::DatabaseError("connection reset by peer".to_string()),
            AppError::RedisError("broken pipe".to_string()),
            AppError::TransactionConflict("WriteConflict".to_string()),
            AppError::InternalError("boom".to_string()),
        ] {
            assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(&error);
            assert_eq!(body["message"], GENERIC_SERVER_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("사용자를 찾을 수 없습니다".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_and_forbidden() {
        assert_eq!(
            AppError::Unauthorized("토큰이 만료되었습니다".to_string()).error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthorizationError("권한 부족".to_string()).error_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_only_transaction_conflict_is_retryable() {
        assert!(AppError::TransactionConflict("dup".to_string()).is_retryable());
        assert!(!AppError::DatabaseError("down".to_string()).is_retryable());
        assert!(!AppError::AuthenticationError("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
