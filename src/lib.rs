//! 스토어프론트 소셜 로그인 서비스
//!
//! Google, 카카오, 네이버, Apple 계정을 스토어프론트의 로컬 사용자 계정 하나로 연결하고
//! JWT 세션 토큰을 발급합니다.
//!
//! # Features
//!
//! - **소셜 로그인**: JSON 방식(Google credential, 카카오 액세스 토큰)과 리다이렉트 방식(모든 프로바이더)
//! - **계정 연동**: 프로바이더 ID → 이메일 → 신규 가입 순서로 하나의 트랜잭션 안에서 결정
//! - **동시성**: 같은 사람의 동시 로그인에도 사용자는 정확히 하나만 생성
//! - **약관 동의**: 필수 동의 전에는 동의 페이지로 안내
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//! - **MongoDB**: 사용자 저장, **Redis**: OAuth state, 리프레시 토큰, 사용자 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답, 쿠키, 리다이렉트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 프로바이더 검증, 계정 연동, 토큰 발급
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 사용자 원장(트랜잭션), state, 리프레시 토큰
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use storefront_auth::domain::models::oauth::social_provider::SocialProvider;
//! use storefront_auth::services::auth::SocialAuthService;
//!
//! let social_auth = SocialAuthService::instance();
//!
//! // 리다이렉트 방식 로그인 시작
//! let url = social_auth.login_url(SocialProvider::Naver, Some("/orders/".into())).await?;
//!
//! // JSON 방식 로그인
//! let login = social_auth.login_with_kakao_token(&access_token).await?;
//! println!("{} ({:?})", login.user.username, login.outcome);
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
