//! 사용자 리포지토리 모듈
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::user_repo::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! let user = user_repo.find_by_id("65f0c0ffee0000000000beef").await?;
//! ```

pub mod ledger;
pub mod user_repo;

#[cfg(test)]
pub mod memory_store;
