//! # Redis 캐시 클라이언트 구현
//!
//! OAuth state, 리프레시 토큰, 사용자 캐시, Apple 공개 키를 저장하는 Redis 클라이언트입니다.
//! 값은 Serde를 통해 JSON 문자열로 저장됩니다.
//!
//! ## 연결 관리
//!
//! 기동 시 만든 멀티플렉스 연결 하나를 복제해 사용합니다.
//! 복제본은 같은 TCP 연결을 공유하므로 요청마다 연결을 새로 맺지 않습니다.

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use serde::{Serialize, de::DeserializeOwned};
use std::env;

#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

/// JSON 값의 필드 하나를 비교해 같을 때만 읽고 삭제 (GET + DEL을 한 번에)
const TAKE_IF_FIELD_EQ_LUA: &str = r#"
local value = redis.call('GET', KEYS[1])
if not value then
  return false
end
local ok, decoded = pcall(cjson.decode, value)
if ok and type(decoded) == 'table' and decoded[ARGV[1]] == ARGV[2] then
  redis.call('DEL', KEYS[1])
  return value
end
return false
"#;

fn serialization_error(e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, "JSON conversion failed", e.to_string()))
}

impl RedisClient {
    /// `REDIS_URL`(기본 `redis://localhost:6379`)에 연결하고 PING으로 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;
        let mut connection = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut connection).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { connection })
    }

    fn conn(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let value: Option<String> = self.conn().get(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(serialization_error))
            .transpose()
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let json = serde_json::to_string(value).map_err(serialization_error)?;
        self.conn().set_ex(key, json, seconds).await
    }

    /// 값을 읽고 즉시 삭제합니다 (GETDEL). 일회용 값에 사용합니다.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let value: Option<String> = self.conn().get_del(key).await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(serialization_error))
            .transpose()
    }

    /// 저장된 JSON의 `field` 값이 `expected`와 같을 때만 읽고 삭제합니다.
    ///
    /// 같은 값으로 동시에 호출해도 하나만 `Some`을 받습니다.
    /// 값이 다르면 키를 건드리지 않고 `None`을 돌려줍니다.
    pub async fn take_if_field_eq<T: DeserializeOwned>(
        &self,
        key: &str,
        field: &str,
        expected: &str,
    ) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.conn();
        let value: Option<String> = Script::new(TAKE_IF_FIELD_EQ_LUA)
            .key(key)
            .arg(field)
            .arg(expected)
            .invoke_async(&mut conn)
            .await?;

        value
            .map(|json| serde_json::from_str(&json).map_err(serialization_error))
            .transpose()
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        self.conn().del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.conn().del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        self.conn().keys(pattern).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        token: String,
        owner: String,
    }

    #[actix_web::test]
    #[ignore] // Redis 서버 필요
    async fn test_take_if_field_eq_hands_value_to_one_caller() {
        let redis = RedisClient::new().await.unwrap();
        let key = format!("test_take_if_field_eq:{}", uuid::Uuid::new_v4());
        let entry = Entry { token: "t-1".to_string(), owner: "u1".to_string() };
        redis.set_with_expiry(&key, &entry, 60).await.unwrap();

        let mismatch: Option<Entry> = redis.take_if_field_eq(&key, "token", "t-0").await.unwrap();
        assert!(mismatch.is_none());

        let (first, second) = futures_util::join!(
            redis.take_if_field_eq::<Entry>(&key, "token", "t-1"),
            redis.take_if_field_eq::<Entry>(&key, "token", "t-1"),
        );
        let taken: Vec<Entry> = [first.unwrap(), second.unwrap()].into_iter().flatten().collect();
        assert_eq!(taken, vec![entry]);
        assert!(redis.get::<Entry>(&key).await.unwrap().is_none());
    }
}
