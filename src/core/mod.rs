//! # Core Framework Module
//!
//! 싱글톤 매크로 기반 의존성 주입 컨테이너를 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입 기반 싱글톤 조회 및 수동 등록
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 서비스 등록
//! - **의존성 해결**: `Arc<T>` 필드 자동 주입
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use singleton_macro::{repository, service};
//!
//! #[repository(name = "user", collection = "users")]
//! pub struct UserRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! #[service(name = "user")]
//! pub struct UserService {
//!     user_repo: Arc<UserRepository>, // 자동 주입
//! }
//!
//! let user_service = UserService::instance();
//! ```
//!
//! ### 애플리케이션 초기화
//!
//! ```rust,ignore
//! ServiceLocator::set(Arc::new(Database::new().await?));
//! ServiceLocator::set(Arc::new(RedisClient::new().await?));
//! ServiceLocator::initialize_all().await?;
//! ```
//!
//! ## 트러블슈팅
//!
//! ```text
//! panic: Circular dependency detected: SocialAuthService is already being initialized
//! ```
//! **해결**: 서비스 계층 구조를 단방향 의존성으로 변경
//!
//! ```text
//! panic: Service not found: Database. Register it with ... ServiceLocator::set()
//! ```
//! **해결**: `main`에서 인프라 컴포넌트를 `ServiceLocator::set()`으로 먼저 등록

pub mod registry;

pub use registry::*;
