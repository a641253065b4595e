//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다.
//! 핸들러는 요청을 DTO로 받고 검증한 뒤, 싱글톤 서비스를 호출하고
//! 결과를 JSON 또는 리다이렉트로 돌려주는 일만 합니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Storefront SPA)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                            ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 프로바이더 검증, 계정 연동, 토큰     ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - MongoDB, Redis                 ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환하고,
//! 에러는 `AppError`의 `ResponseError` 구현이 `{"success": false, "message": ...}`로 바꿉니다.
//!
//! ## 모듈 구성
//!
//! - **`auth`**: 소셜 로그인, 콜백, 토큰 갱신, 로그아웃, 내 정보
//! - **`users`**: 약관 동의, 중복 확인

pub mod users;
pub mod auth;
