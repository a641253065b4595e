//! Users Entity Module
//!
//! 회원 엔티티를 정의합니다.
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! let user = User::new_social(&identity, "alice".to_string());
//! assert_eq!(user.provider_id(identity.provider), Some(identity.subject.as_str()));
//! ```

pub mod user;
