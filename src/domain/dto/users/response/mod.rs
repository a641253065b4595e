//! # Response DTOs
//!
//! API 응답 형식입니다. 비밀번호 해시나 프로바이더 ID 원문처럼
//! 클라이언트가 알 필요 없는 값은 담지 않습니다.

pub mod user_response;
pub mod consent_response;

pub use user_response::{UserResponse, UserProfileResponse, LoginResponse, OAuthLoginUrlResponse};
pub use consent_response::{ConsentResponse, DuplicateCheckResponse, FieldAvailability};
