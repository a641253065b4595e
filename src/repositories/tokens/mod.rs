//! 토큰 저장소 모듈 (Redis)

pub mod token_repository;
