//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다. 소셜 계정 연동은 다중 문서 트랜잭션을 사용하므로
//! 레플리카 셋(단일 노드 포함) 또는 샤드 클러스터가 필요합니다.
//!
//! # 환경 변수 설정
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="storefront"
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::db::Database;
//! use crate::core::registry::ServiceLocator;
//!
//! let database = Database::new().await?;
//! ServiceLocator::set(Arc::new(database));
//! ```

use mongodb::{Client, ClientSession, options::ClientOptions};
use std::env;
use log::info;
use crate::errors::AppResult;

/// MongoDB 클라이언트와 대상 데이터베이스 이름
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수로 연결을 만들고 `ping`으로 가용성을 확인합니다.
    ///
    /// # Errors
    ///
    /// * URI 파싱 실패
    /// * 서버 연결 실패
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_string());

        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "storefront_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("storefront_auth".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 트랜잭션용 세션을 시작합니다.
    pub async fn start_session(&self) -> AppResult<ClientSession> {
        Ok(self.client.start_session().await?)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
