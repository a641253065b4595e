//! # Domain Layer Module
//!
//! 비즈니스 규칙을 담는 도메인 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities   - MongoDB 문서와 매핑되는 회원 엔티티
//! ├── dto        - API 요청/응답
//! └── models     - 소셜 프로바이더 모델, 검증된 신원, 토큰
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB)
//! ```
//!
//! 프로바이더마다 응답 형식은 다르지만 모두 `VerifiedIdentity` 하나로 모인 뒤
//! 계정 연동 로직으로 넘어갑니다. 프로바이더별 분기는 `models::oauth` 밖으로 새지 않습니다.

pub mod entities;
pub mod dto;
pub mod models;
