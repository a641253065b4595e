//! # 소셜 계정 연동
//!
//! 검증된 외부 신원([`VerifiedIdentity`])을 로컬 회원 하나로 연결합니다.
//! 프로바이더와 저장소 구현에 대해 제네릭이며, 모든 프로바이더가 같은 규칙을 따릅니다.
//!
//! ## 규칙
//!
//! 1. 프로바이더 ID로 찾으면 그 회원을 그대로 돌려줍니다. 쓰기 없음.
//! 2. 이메일로 찾으면 그 회원에 프로바이더 ID를 연결합니다.
//!    같은 프로바이더의 다른 ID가 이미 연결되어 있으면 인증 오류입니다.
//! 3. 둘 다 없으면 새 회원을 만듭니다. 사용자명은 `base`, `base_1`, `base_2` … 중
//!    비어 있는 첫 번째 값이고 동의 항목은 모두 false입니다.
//!
//! 세 단계는 하나의 트랜잭션 안에서 실행되며, 동시 요청과 충돌하면
//! 작업 전체를 [`MAX_TX_ATTEMPTS`]번까지 다시 시도합니다.
//! 재시도에서는 먼저 커밋된 회원이 1·2단계에서 보이므로 중복 가입이 생기지 않습니다.

use std::future::Future;
use crate::domain::entities::users::user::User;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::ledger::{UserLedger, UserStore};

pub const MAX_TX_ATTEMPTS: usize = 3;
pub const MAX_USERNAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// 이미 같은 프로바이더 ID로 연결된 회원
    Existing,
    /// 이메일이 같은 기존 회원에 프로바이더 ID를 연결
    Linked,
    /// 새로 가입
    Created,
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub user: User,
    pub outcome: ReconcileOutcome,
}

/// 열린 작업 단위 안에서 연동 규칙을 한 번 실행합니다.
pub async fn reconcile<L: UserLedger>(ledger: &mut L, identity: &VerifiedIdentity) -> AppResult<Reconciled> {
    let provider = identity.provider;

    if let Some(user) = ledger.find_by_provider_id(provider, &identity.subject).await? {
        return Ok(Reconciled { user, outcome: ReconcileOutcome::Existing });
    }

    if let Some(email) = identity.email.as_deref() {
        if let Some(user) = ledger.find_by_email(email).await? {
            if user.provider_id(provider).is_some() {
                return Err(AppError::AuthenticationError(format!(
                    "이미 다른 {} 계정과 연결된 이메일입니다",
                    provider.label()
                )));
            }

            let user = ledger.attach_provider_id(&user, provider, &identity.subject).await?;
            return Ok(Reconciled { user, outcome: ReconcileOutcome::Linked });
        }
    }

    let username = unique_username(ledger, &identity.username_base()).await?;
    let user = ledger.insert(User::new_social(identity, username)).await?;
    Ok(Reconciled { user, outcome: ReconcileOutcome::Created })
}

/// `base`부터 `base_1`, `base_2` … 순으로 비어 있는 사용자명을 찾습니다.
pub async fn unique_username<L: UserLedger>(ledger: &mut L, base: &str) -> AppResult<String> {
    if !ledger.username_exists(base).await? {
        return Ok(base.to_string());
    }

    for suffix in 1..MAX_USERNAME_ATTEMPTS {
        let candidate = format!("{}_{}", base, suffix);
        if !ledger.username_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(AppError::InternalError(format!(
        "사용자명 생성 실패: '{}' 기반 후보가 모두 사용 중입니다",
        base
    )))
}

/// 작업 단위 하나를 열어 연동하고 커밋합니다. 실패하면 롤백합니다.
pub async fn reconcile_once<S: UserStore>(store: &S, identity: &VerifiedIdentity) -> AppResult<Reconciled> {
    let mut tx = store.begin().await?;

    let result = match reconcile(&mut tx, identity).await {
        Ok(reconciled) => tx.commit().await.map(|_| reconciled),
        Err(e) => Err(e),
    };

    if result.is_err() {
        if let Err(abort_error) = tx.abort().await {
            log::debug!("트랜잭션 롤백 실패 (무시): {}", abort_error);
        }
    }

    result
}

/// 충돌로 실패한 작업 단위를 처음부터 다시 실행합니다.
pub async fn reconcile_with_retry<S: UserStore>(store: &S, identity: &VerifiedIdentity) -> AppResult<Reconciled> {
    let mut attempt = 1;
    loop {
        match reconcile_once(store, identity).await {
            Err(e) if e.is_retryable() && attempt < MAX_TX_ATTEMPTS => {
                log::warn!(
                    "{} 계정 연동 충돌, 재시도 {}/{}: {}",
                    identity.provider, attempt, MAX_TX_ATTEMPTS, e
                );
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// 프로바이더 검증을 먼저 끝내고, 성공했을 때만 저장소에 접근합니다.
pub async fn authenticate<S, F>(store: &S, verification: F) -> AppResult<Reconciled>
where
    S: UserStore,
    F: Future<Output = AppResult<VerifiedIdentity>>,
{
    let identity = verification.await?.normalized()?;
    let reconciled = reconcile_with_retry(store, &identity).await?;

    log::info!(
        "{} 로그인 연동 완료 - user: {}, 결과: {:?}",
        identity.provider,
        reconciled.user.username,
        reconciled.outcome
    );

    Ok(reconciled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::oauth::social_provider::SocialProvider;
    use crate::repositories::users::memory_store::MemoryUserStore;

    fn google(subject: &str, email: &str) -> VerifiedIdentity {
        VerifiedIdentity::new(SocialProvider::Google, subject)
            .with_email(Some(email.to_string()))
            .with_display_name(Some("Alice Kim".to_string()))
    }

    fn existing(identity: &VerifiedIdentity, username: &str) -> User {
        User::new_social(identity, username.to_string())
    }

    #[actix_web::test]
    async fn test_unseen_identity_creates_one_user() {
        let store = MemoryUserStore::new();

        let result = reconcile_with_retry(&store, &google("g-1", "alice@example.com")).await.unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::Created);
        assert_eq!(result.user.username, "alice");
        assert_eq!(result.user.google_id.as_deref(), Some("g-1"));
        assert_eq!(result.user.email.as_deref(), Some("alice@example.com"));
        assert!(!result.user.terms_of_use);
        assert!(!result.user.personal_info_consent);
        assert_eq!(store.users().len(), 1);
    }

    #[actix_web::test]
    async fn test_known_provider_id_returns_user_unchanged() {
        let identity = google("g-1", "alice@example.com");
        let store = MemoryUserStore::with_users(vec![existing(&identity, "alice")]);
        let before = store.users()[0].clone();

        let changed_profile = identity.clone().with_display_name(Some("Someone Else".to_string()));
        let result = reconcile_with_retry(&store, &changed_profile).await.unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::Existing);
        assert_eq!(result.user.id, before.id);
        assert_eq!(store.commits(), 0);

        let after = &store.users()[0];
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[actix_web::test]
    async fn test_known_email_links_provider_id() {
        let kakao = VerifiedIdentity::new(SocialProvider::Kakao, "3141")
            .with_email(Some("alice@example.com".to_string()));
        let store = MemoryUserStore::with_users(vec![existing(&kakao, "alice")]);

        let result = reconcile_with_retry(&store, &google("g-1", "alice@example.com")).await.unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::Linked);
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].google_id.as_deref(), Some("g-1"));
        assert_eq!(users[0].kakao_id.as_deref(), Some("3141"));
        assert_eq!(users[0].email.as_deref(), Some("alice@example.com"));
    }

    #[actix_web::test]
    async fn test_email_bound_to_other_id_of_same_provider_is_refused() {
        let store = MemoryUserStore::with_users(vec![existing(&google("g-old", "alice@example.com"), "alice")]);

        let result = reconcile_with_retry(&store, &google("g-new", "alice@example.com")).await;

        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].google_id.as_deref(), Some("g-old"));
    }

    #[actix_web::test]
    async fn test_username_suffix_skips_taken_names() {
        let store = MemoryUserStore::with_users(vec![
            existing(&google("g-a", "alice@one.com"), "alice"),
            existing(&google("g-b", "alice@two.com"), "alice_1"),
        ]);

        let result = reconcile_with_retry(&store, &google("g-c", "alice@three.com")).await.unwrap();

        assert_eq!(result.user.username, "alice_2");
        assert_eq!(store.users().len(), 3);
    }

    #[actix_web::test]
    async fn test_identity_without_email_uses_nickname() {
        let store = MemoryUserStore::new();
        let kakao = VerifiedIdentity::new(SocialProvider::Kakao, "42")
            .with_nickname(Some("춘식이".to_string()));

        let result = reconcile_with_retry(&store, &kakao).await.unwrap();

        assert_eq!(result.user.username, "춘식이");
        assert!(result.user.email.is_none());
    }

    #[actix_web::test]
    async fn test_concurrent_reconciliations_yield_one_user() {
        let store = MemoryUserStore::new();
        let identity = google("g-1", "alice@example.com");

        let (first, second) = futures_util::join!(
            reconcile_with_retry(&store, &identity),
            reconcile_with_retry(&store, &identity),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(first.user.id, second.user.id);
        assert_eq!(store.users().len(), 1);
        assert!(store.begun() >= 3);
    }

    #[actix_web::test]
    async fn test_concurrent_different_providers_same_email_merge() {
        let store = MemoryUserStore::new();
        let google_identity = google("g-1", "alice@example.com");
        let naver_identity = VerifiedIdentity::new(SocialProvider::Naver, "n-1")
            .with_email(Some("alice@example.com".to_string()));

        let (a, b) = futures_util::join!(
            reconcile_with_retry(&store, &google_identity),
            reconcile_with_retry(&store, &naver_identity),
        );

        assert_eq!(a.unwrap().user.id, b.unwrap().user.id);
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].google_id.as_deref(), Some("g-1"));
        assert_eq!(users[0].naver_id.as_deref(), Some("n-1"));
    }

    #[actix_web::test]
    async fn test_transient_conflict_is_retried() {
        let store = MemoryUserStore::new();
        store.fail_next_commits(2);

        let result = reconcile_with_retry(&store, &google("g-1", "alice@example.com")).await.unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::Created);
        assert_eq!(store.begun(), 3);
        assert_eq!(store.users().len(), 1);
    }

    #[actix_web::test]
    async fn test_retries_are_bounded() {
        let store = MemoryUserStore::new();
        store.fail_next_commits(MAX_TX_ATTEMPTS);

        let result = reconcile_with_retry(&store, &google("g-1", "alice@example.com")).await;

        assert!(matches!(result, Err(AppError::TransactionConflict(_))));
        assert_eq!(store.begun(), MAX_TX_ATTEMPTS);
        assert!(store.users().is_empty());
    }

    #[actix_web::test]
    async fn test_failed_verification_never_touches_store() {
        let store = MemoryUserStore::new();

        let result = authenticate(&store, async {
            Err(AppError::AuthenticationError("잘못된 토큰 발급자입니다".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
        assert_eq!(store.begun(), 0);
        assert!(store.users().is_empty());
    }

    #[actix_web::test]
    async fn test_authenticate_normalizes_identity() {
        let store = MemoryUserStore::new();

        let result = authenticate(&store, async {
            Ok(google(" g-1 ", " Alice@Example.COM "))
        })
        .await
        .unwrap();

        assert_eq!(result.user.google_id.as_deref(), Some("g-1"));
        assert_eq!(result.user.email.as_deref(), Some("alice@example.com"));
    }

    #[actix_web::test]
    async fn test_missing_required_email_is_validation_error() {
        let store = MemoryUserStore::new();

        let result = authenticate(&store, async {
            Ok(VerifiedIdentity::new(SocialProvider::Naver, "n-1"))
        })
        .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(store.begun(), 0);
    }
}
