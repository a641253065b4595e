//! 테스트용 메모리 사용자 저장소
//!
//! MongoDB 스냅샷 트랜잭션과 같은 방식으로 동작합니다.
//! 작업 단위는 시작 시점의 스냅샷을 읽고, 커밋할 때 유니크 제약을 다시 검사해
//! 먼저 커밋된 쓰기와 충돌하면 `TransactionConflict`를 돌려줍니다.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::users::user::User;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::ledger::{UserLedger, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
    begun: AtomicUsize,
    commits: Arc<AtomicUsize>,
    failing_commits: Arc<AtomicUsize>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.users.lock().unwrap();
            for mut user in users {
                user.id.get_or_insert_with(ObjectId::new);
                guard.push(user);
            }
        }
        store
    }

    /// 다음 `count`번의 커밋을 일시적 충돌로 실패시킵니다.
    pub fn fail_next_commits(&self, count: usize) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    /// 실제로 변경이 반영된 커밋 수
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    type Tx = MemoryUserTx;

    async fn begin(&self) -> AppResult<MemoryUserTx> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.users.lock().unwrap().clone();
        tokio::task::yield_now().await;

        Ok(MemoryUserTx {
            shared: Arc::clone(&self.users),
            failing_commits: Arc::clone(&self.failing_commits),
            commits: Arc::clone(&self.commits),
            working: snapshot,
            writes: Vec::new(),
        })
    }
}

enum Write {
    Insert(User),
    Attach { id: ObjectId, provider: SocialProvider, subject: String },
}

pub struct MemoryUserTx {
    shared: Arc<Mutex<Vec<User>>>,
    failing_commits: Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
    working: Vec<User>,
    writes: Vec<Write>,
}

fn conflict(reason: &str) -> AppError {
    AppError::TransactionConflict(reason.to_string())
}

fn check_unique(users: &[User], candidate: &User) -> AppResult<()> {
    for existing in users.iter().filter(|u| u.id != candidate.id) {
        if existing.username == candidate.username {
            return Err(conflict("duplicate username"));
        }
        if candidate.email.is_some() && existing.email == candidate.email {
            return Err(conflict("duplicate email"));
        }
        for provider in SocialProvider::ALL {
            if let Some(subject) = candidate.provider_id(provider) {
                if existing.provider_id(provider) == Some(subject) {
                    return Err(conflict("duplicate provider id"));
                }
            }
        }
    }
    Ok(())
}

#[async_trait]
impl UserLedger for MemoryUserTx {
    async fn find_by_provider_id(
        &mut self,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<Option<User>> {
        tokio::task::yield_now().await;
        Ok(self.working.iter().find(|u| u.provider_id(provider) == Some(subject)).cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        tokio::task::yield_now().await;
        Ok(self.working.iter().find(|u| u.email.as_deref() == Some(email)).cloned())
    }

    async fn username_exists(&mut self, username: &str) -> AppResult<bool> {
        Ok(self.working.iter().any(|u| u.username == username))
    }

    async fn attach_provider_id(
        &mut self,
        user: &User,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<User> {
        let id = user.id.ok_or_else(|| conflict("missing id"))?;
        let target = self
            .working
            .iter_mut()
            .find(|u| u.id == Some(id))
            .ok_or_else(|| conflict("user vanished"))?;

        if target.provider_id(provider).is_some() {
            return Err(conflict("provider already linked"));
        }
        target.set_provider_id(provider, subject.to_string());
        let updated = target.clone();

        self.writes.push(Write::Attach { id, provider, subject: subject.to_string() });
        Ok(updated)
    }

    async fn insert(&mut self, mut user: User) -> AppResult<User> {
        user.id = Some(ObjectId::new());
        check_unique(&self.working, &user)?;
        self.working.push(user.clone());
        self.writes.push(Write::Insert(user.clone()));
        Ok(user)
    }

    async fn commit(&mut self) -> AppResult<()> {
        tokio::task::yield_now().await;

        let injected = self
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(conflict("injected transient error"));
        }

        if self.writes.is_empty() {
            return Ok(());
        }

        let mut shared = self.shared.lock().unwrap();
        let mut next = shared.clone();

        for write in self.writes.drain(..) {
            match write {
                Write::Insert(user) => {
                    check_unique(&next, &user)?;
                    next.push(user);
                }
                Write::Attach { id, provider, subject } => {
                    let target = next
                        .iter_mut()
                        .find(|u| u.id == Some(id))
                        .ok_or_else(|| conflict("user vanished"))?;
                    if target.provider_id(provider).is_some() {
                        return Err(conflict("provider already linked"));
                    }
                    target.set_provider_id(provider, subject);
                    let updated = target.clone();
                    check_unique(&next, &updated)?;
                }
            }
        }

        *shared = next;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn abort(&mut self) -> AppResult<()> {
        self.writes.clear();
        Ok(())
    }
}
