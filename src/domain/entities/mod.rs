//! # Domain Entities Module
//!
//! MongoDB 문서와 직접 매핑되는 엔티티입니다.
//!
//! ## 컬렉션
//!
//! | 엔티티 | 컬렉션 | 유니크 인덱스 |
//! |--------|--------|---------------|
//! | [`users::user::User`] | `users` | `username`, `email`(sparse), `google_id`·`kakao_id`·`naver_id`·`apple_id`(sparse) |
//!
//! 인덱스는 서버 시작 시 `UserRepository::create_indexes`가 만듭니다.

pub mod users;
