//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델입니다.
//!
//! - [`auth`]: 요청 컨텍스트의 인증 사용자, 미들웨어 인증 모드
//! - [`oauth`]: 소셜 프로바이더 응답 모델과 검증된 외부 신원
//! - [`token`]: JWT 클레임과 토큰 쌍

pub mod auth;
pub mod oauth;
pub mod token;
