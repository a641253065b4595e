//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//!
//! # Features
//!
//! - 소셜 로그인 (Google, 카카오, 네이버, Apple)과 회원 계정 연동
//! - JWT 세션 토큰 발급·갱신·폐기
//! - 약관 동의, 아이디·이메일 중복 확인
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::SocialAuthService;
//!
//! let login = SocialAuthService::instance()
//!     .login_with_kakao_token(&access_token)
//!     .await?;
//! ```

pub mod users;
pub mod auth;
