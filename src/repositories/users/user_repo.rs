//! # 사용자 리포지토리 구현
//!
//! 회원 컬렉션(`users`)의 데이터 액세스 계층입니다.
//!
//! - 단건 조회는 Redis 캐시(`user_repository:{id}`, 10분)를 먼저 봅니다.
//! - 계정 연동은 [`UserStore`] 구현으로 MongoDB 트랜잭션 안에서 실행됩니다.
//! - 유니크 인덱스가 동시 가입 중복을 막는 최종 방어선입니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    error::{ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT},
    options::{FindOneAndUpdateOptions, IndexOptions, ReadConcern, ReturnDocument, TransactionOptions, WriteConcern},
    ClientSession, Collection, IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
    domain::models::oauth::social_provider::SocialProvider,
    repositories::users::ledger::{UserLedger, UserStore},
};
use singleton_macro::repository;
use crate::errors::{AppError, AppResult};

const USER_CACHE_TTL_SECONDS: u64 = 600;
const DUPLICATE_KEY: i32 = 11000;
const WRITE_CONFLICT: i32 = 112;

/// 사용자 데이터 액세스 리포지토리
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

/// 재시도하면 성공할 수 있는 오류인지 판별해 `TransactionConflict`로 바꿉니다.
pub(crate) fn map_transaction_error(error: mongodb::error::Error) -> AppError {
    let duplicate_or_conflict = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => {
            command_error.code == DUPLICATE_KEY || command_error.code == WRITE_CONFLICT
        }
        _ => false,
    };

    if duplicate_or_conflict
        || error.contains_label(TRANSIENT_TRANSACTION_ERROR)
        || error.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
    {
        AppError::TransactionConflict(error.to_string())
    } else {
        AppError::DatabaseError(error.to_string())
    }
}

fn provider_filter(provider: SocialProvider, subject: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(provider.id_field(), subject);
    filter
}

fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
}

impl UserRepository {
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, USER_CACHE_TTL_SECONDS)
                .await;
        }

        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let found = self.collection::<User>()
            .find_one(doc! { "username": username })
            .await?;
        Ok(found.is_some())
    }

    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let found = self.collection::<User>()
            .find_one(doc! { "email": email })
            .await?;
        Ok(found.is_some())
    }

    /// `$set` 갱신 후 변경된 문서를 돌려주고 캐시를 지웁니다.
    pub async fn update(&self, id: &str, update_doc: Document) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated_user = self.collection::<User>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await?;

        if updated_user.is_some() {
            self.evict(id).await;
        }

        Ok(updated_user)
    }

    pub async fn touch_last_login(&self, id: &str) -> AppResult<()> {
        let now = DateTime::now();
        self.update(id, doc! { "last_login_at": now, "updated_at": now }).await?;
        Ok(())
    }

    /// 캐시 삭제 실패는 TTL이 지나면 해소되므로 로그만 남깁니다.
    pub async fn evict(&self, id: &str) {
        if let Err(e) = self.invalidate_cache(id).await {
            log::warn!("사용자 캐시 삭제 실패 ({}): {}", id, e);
        }
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let collection = self.collection::<User>();

        let mut indexes = vec![
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("email_unique".to_string())
                    .build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build())
                .build(),
        ];

        for provider in SocialProvider::ALL {
            let mut keys = Document::new();
            keys.insert(provider.id_field(), 1);

            indexes.push(
                IndexModel::builder()
                    .keys(keys)
                    .options(IndexOptions::builder()
                        .unique(true)
                        .sparse(true)
                        .name(format!("{}_unique", provider.id_field()))
                        .build())
                    .build(),
            );
        }

        collection.create_indexes(indexes).await?;

        log::info!("users 컬렉션 인덱스 생성 완료");
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    type Tx = MongoUserTx;

    async fn begin(&self) -> AppResult<MongoUserTx> {
        let mut session = self.db.start_session().await?;

        let options = TransactionOptions::builder()
            .read_concern(ReadConcern::snapshot())
            .write_concern(WriteConcern::majority())
            .build();

        session
            .start_transaction()
            .with_options(options)
            .await
            .map_err(map_transaction_error)?;

        Ok(MongoUserTx {
            users: self.collection::<User>(),
            session,
        })
    }
}

/// MongoDB 세션 하나에 묶인 계정 연동 작업 단위
pub struct MongoUserTx {
    users: Collection<User>,
    session: ClientSession,
}

#[async_trait]
impl UserLedger for MongoUserTx {
    async fn find_by_provider_id(
        &mut self,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<Option<User>> {
        self.users
            .find_one(provider_filter(provider, subject))
            .session(&mut self.session)
            .await
            .map_err(map_transaction_error)
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        self.users
            .find_one(doc! { "email": email })
            .session(&mut self.session)
            .await
            .map_err(map_transaction_error)
    }

    async fn username_exists(&mut self, username: &str) -> AppResult<bool> {
        let found = self.users
            .find_one(doc! { "username": username })
            .session(&mut self.session)
            .await
            .map_err(map_transaction_error)?;
        Ok(found.is_some())
    }

    async fn attach_provider_id(
        &mut self,
        user: &User,
        provider: SocialProvider,
        subject: &str,
    ) -> AppResult<User> {
        let id = user.id.ok_or_else(|| {
            AppError::InternalError("저장되지 않은 사용자에는 연결할 수 없습니다".to_string())
        })?;

        let mut filter = doc! { "_id": id };
        filter.insert(provider.id_field(), doc! { "$exists": false });

        let mut set = provider_filter(provider, subject);
        set.insert("updated_at", DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self.users
            .find_one_and_update(filter, doc! { "$set": set })
            .with_options(options)
            .session(&mut self.session)
            .await
            .map_err(map_transaction_error)?;

        updated.ok_or_else(|| {
            AppError::TransactionConflict(format!(
                "{} 필드가 다른 요청에 의해 먼저 설정되었습니다",
                provider.id_field()
            ))
        })
    }

    async fn insert(&mut self, mut user: User) -> AppResult<User> {
        let result = self.users
            .insert_one(&user)
            .session(&mut self.session)
            .await
            .map_err(map_transaction_error)?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("생성된 사용자 ID를 확인할 수 없습니다".to_string())
        })?;
        user.id = Some(id);
        Ok(user)
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.session
            .commit_transaction()
            .await
            .map_err(map_transaction_error)
    }

    async fn abort(&mut self) -> AppResult<()> {
        self.session
            .abort_transaction()
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::from_document;
    use mongodb::error::{CommandError, Error, WriteError};

    fn write_error(code: i32) -> Error {
        let write_error: WriteError = from_document(doc! {
            "code": code,
            "errmsg": "E11000 duplicate key error collection: storefront.users index: email_1",
        })
        .unwrap();
        Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    fn command_error(code: i32, code_name: &str) -> Error {
        let command_error: CommandError = from_document(doc! {
            "code": code,
            "codeName": code_name,
            "errmsg": "command failed",
        })
        .unwrap();
        Error::from(ErrorKind::Command(command_error))
    }

    #[test]
    fn test_duplicate_key_write_is_retryable() {
        let mapped = map_transaction_error(write_error(DUPLICATE_KEY));
        assert!(matches!(mapped, AppError::TransactionConflict(_)));
        assert!(mapped.is_retryable());
    }

    #[test]
    fn test_write_conflict_and_duplicate_command_are_retryable() {
        assert!(matches!(
            map_transaction_error(command_error(WRITE_CONFLICT, "WriteConflict")),
            AppError::TransactionConflict(_)
        ));
        assert!(matches!(
            map_transaction_error(command_error(DUPLICATE_KEY, "DuplicateKey")),
            AppError::TransactionConflict(_)
        ));
    }

    #[test]
    fn test_other_errors_are_database_errors() {
        assert!(matches!(
            map_transaction_error(command_error(2, "BadValue")),
            AppError::DatabaseError(_)
        ));
        assert!(matches!(
            map_transaction_error(write_error(121)),
            AppError::DatabaseError(_)
        ));
        assert!(matches!(
            map_transaction_error(Error::custom("connection reset")),
            AppError::DatabaseError(_)
        ));
    }
}
