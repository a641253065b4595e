//! 공통 유틸리티
//!
//! - [`string_utils`]: 입력 문자열 정리, 프로바이더 응답의 느슨한 타입 역직렬화
//! - [`redirect`]: 로그인 후 이동 경로(`next`) 검증

pub mod string_utils;
pub mod redirect;
