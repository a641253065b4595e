//! # 사용자 저장소 트랜잭션 경계
//!
//! 계정 연동은 "조회 → 연결 또는 생성"을 하나의 작업 단위 안에서 끝내야 합니다.
//! [`UserStore`]는 작업 단위를 열고, [`UserLedger`]는 그 안에서 실행되는 연산입니다.
//!
//! 운영 환경에서는 MongoDB 다중 문서 트랜잭션([`super::user_repo::MongoUserTx`])이,
//! 테스트에서는 메모리 저장소가 구현합니다.
//!
//! ## 오류 규약
//!
//! 다른 요청과 충돌해서 작업을 처음부터 다시 해야 하는 경우
//! (쓰기 충돌, 일시적 트랜잭션 오류, 유니크 인덱스 위반)에는
//! `AppError::TransactionConflict`를 반환해야 합니다.
//! 호출자는 이 오류만 재시도합니다.

use async_trait::async_trait;
use crate::domain::entities::users::user::User;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::errors::AppResult;

/// 작업 단위를 여는 저장소
#[async_trait]
pub trait UserStore: Send + Sync {
    type Tx: UserLedger;

    async fn begin(&self) -> AppResult<Self::Tx>;
}

/// 열린 작업 단위 안의 연산
///
/// `commit`이나 `abort`를 호출하지 않고 버리면 변경 사항은 반영되지 않습니다.
#[async_trait]
pub trait UserLedger: Send {
    async fn find_by_provider_id(
        &mut self,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<Option<User>>;

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>>;

    async fn username_exists(&mut self, username: &str) -> AppResult<bool>;

    /// 기존 사용자에 프로바이더 ID를 연결하고 갱신된 사용자를 돌려줍니다.
    ///
    /// 그 사이 같은 필드가 채워졌다면 `TransactionConflict`입니다.
    async fn attach_provider_id(
        &mut self,
        user: &User,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<User>;

    /// 새 사용자를 저장하고 ID가 채워진 사용자를 돌려줍니다.
    async fn insert(&mut self, user: User) -> AppResult<User>;

    async fn commit(&mut self) -> AppResult<()>;

    async fn abort(&mut self) -> AppResult<()>;
}
