//! # OAuth 모델
//!
//! 소셜 로그인 프로바이더별 응답 모델과, 그 결과를 하나로 모은 [`VerifiedIdentity`]입니다.
//!
//! ```text
//! Google tokeninfo ─┐
//! Kakao /v2/user/me ─┤
//! Naver /v1/nid/me ──┼──▶ VerifiedIdentity ──▶ 계정 연동
//! Apple id_token ────┘
//! ```
//!
//! [`VerifiedIdentity`]: verified_identity::VerifiedIdentity

pub mod social_provider;
pub mod verified_identity;
pub mod provider_token;
pub mod google;
pub mod kakao;
pub mod naver;
pub mod apple;

pub use social_provider::SocialProvider;
pub use verified_identity::VerifiedIdentity;
