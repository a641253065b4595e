//! 회원 관련 서비스

pub mod user_service;
