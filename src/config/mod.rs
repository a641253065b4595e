//! # Configuration Module
//!
//! 환경 변수 기반 설정값을 중앙에서 관리합니다.
//! `.env.dev` / `.env.prod` 파일은 `main`에서 `PROFILE`에 따라 `dotenv`로 로드됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 요청 제한, HTTP 클라이언트 설정
//! - [`auth_config`] - 소셜 프로바이더, JWT, OAuth state, 동의 페이지 설정
//!
//! ## 선택적 환경 변수
//!
//! ```bash
//! export ENVIRONMENT="production"        # development, test, staging, production
//! export HOST="127.0.0.1"
//! export PORT="8080"
//! export CORS_ALLOWED_ORIGINS="https://shop.example.com"
//! export JWT_SECRET="your-super-secret-key"
//! export OAUTH_SESSION_TIMEOUT_MINUTES="10"
//! export HTTP_CONNECT_TIMEOUT_SECONDS="5"
//! export HTTP_REQUEST_TIMEOUT_SECONDS="15"
//! export RATE_LIMIT_PER_SECOND="100"
//! export RATE_LIMIT_BURST_SIZE="200"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
