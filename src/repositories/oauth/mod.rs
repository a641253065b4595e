//! OAuth state 저장소 모듈 (Redis)

pub mod oauth_state_repository;
