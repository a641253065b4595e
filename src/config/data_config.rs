//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, 외부 HTTP 호출 제한 시간을 관리합니다.

use std::env;
use std::time::Duration;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수로 현재 환경을 결정합니다. 기본값은 운영 환경입니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 세션 쿠키에 `Secure` 속성을 붙여야 하는지 여부
    pub fn requires_secure_cookies(&self) -> bool {
        matches!(self, Environment::Staging | Environment::Production)
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn workers() -> usize {
        env::var("SERVER_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }

    /// 쉼표로 구분된 `CORS_ALLOWED_ORIGINS`, 없으면 로컬 프론트엔드 주소
    pub fn allowed_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

/// `actix-governor` IP별 요청 제한
pub struct RateLimitConfig;

impl RateLimitConfig {
    /// 초당 보충되는 요청 수 (`RATE_LIMIT_PER_SECOND`, 기본 100)
    pub fn per_second() -> u64 {
        env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(100)
    }

    /// 한 번에 허용하는 최대 요청 수 (`RATE_LIMIT_BURST_SIZE`, 기본 200)
    pub fn burst_size() -> u32 {
        env::var("RATE_LIMIT_BURST_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(200)
    }
}

/// 프로바이더 API 호출용 HTTP 클라이언트 설정
pub struct HttpClientConfig;

impl HttpClientConfig {
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(Self::seconds("HTTP_CONNECT_TIMEOUT_SECONDS", 5))
    }

    pub fn request_timeout() -> Duration {
        Duration::from_secs(Self::seconds("HTTP_REQUEST_TIMEOUT_SECONDS", 15))
    }

    fn seconds(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&s| s > 0)
            .unwrap_or(default)
    }
}
