//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 키-값 저장소입니다.
//!
//! # 사용하는 키
//!
//! | 키 | 용도 | TTL |
//! |----|------|-----|
//! | `oauth_state:{state}` | 리다이렉트 로그인 CSRF state와 `next` | `OAUTH_SESSION_TIMEOUT_MINUTES` |
//! | `refresh_token:{user_id}` | 발급된 리프레시 토큰 | `JWT_REFRESH_EXPIRATION_DAYS` |
//! | `user_repository:{user_id}` | 사용자 조회 캐시 | 10분 |
//! | `apple_jwks:{kid}` | Apple ID 토큰 서명 공개 키 | `APPLE_JWKS_CACHE_TTL_SECONDS` (1시간) |
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
