//! # 인증 서비스
//!
//! | 서비스 | 역할 |
//! |--------|------|
//! | [`social_auth_service::SocialAuthService`] | 로그인 흐름 전체 |
//! | [`identity_reconciler`] | 외부 신원 → 회원 연동 (트랜잭션, 재시도) |
//! | `GoogleAuthService` 외 3종 | 프로바이더별 자격 증명 검증 |
//! | [`token_service::TokenService`] | JWT 발급·검증, 리프레시 토큰 관리 |

pub mod oauth_http;
pub mod identity_reconciler;
pub mod google_auth_service;
pub mod kakao_auth_service;
pub mod naver_auth_service;
pub mod apple_auth_service;
pub mod social_auth_service;
pub mod token_service;

pub use social_auth_service::*;
pub use token_service::*;
