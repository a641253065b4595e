//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로를 사용하여 싱글톤으로 관리되는 리포지토리들을 제공합니다.
//!
//! | 리포지토리 | 저장소 | 역할 |
//! |------------|--------|------|
//! | `UserRepository` | MongoDB `users` + Redis 캐시 | 회원 조회, 계정 연동 트랜잭션 |
//! | `TokenRepository` | Redis `refresh_token:*` | 리프레시 토큰 |
//! | `OAuthStateRepository` | Redis `oauth_state:*` | 일회용 OAuth state |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::user_repo::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! user_repo.create_indexes().await?;
//! ```

pub mod users;
pub mod tokens;
pub mod oauth;
