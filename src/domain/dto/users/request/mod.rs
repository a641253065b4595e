//! # Request DTOs
//!
//! 클라이언트 요청 본문과 쿼리 파라미터를 매핑합니다.
//!
//! | DTO | 사용처 |
//! |-----|--------|
//! | `GoogleLoginRequest` | `POST /api/v1/auth/google` |
//! | `KakaoLoginRequest` | `POST /api/v1/auth/kakao` |
//! | `NextQuery` | 로그인 시작 경로의 `?next=` |
//! | `OAuthCallbackQuery` | Google·카카오·네이버 콜백 |
//! | `AppleCallbackForm` | Apple form_post 콜백 |
//! | `RefreshTokenRequest` | `POST /api/v1/auth/refresh` |
//! | `ConsentRequest` | `POST /api/v1/users/consent` |
//! | `DuplicateCheckQuery` | `GET /api/v1/users/check-duplicate` |
//!
//! 형식 검증은 `validator`로 하고, 실패하면 `AppError::ValidationError`(400)가 됩니다.

pub mod auth_request;
pub mod consent_request;

pub use auth_request::*;
pub use consent_request::*;
