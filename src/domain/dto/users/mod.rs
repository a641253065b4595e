//! # Users DTO Module
//!
//! 회원 인증·동의 API의 요청/응답 DTO입니다.
//!
//! ```text
//! users/
//! ├── request/    소셜 로그인, 콜백, 토큰 갱신, 동의, 중복 확인
//! └── response/   로그인 결과, 사용자 정보, 동의 결과
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
