//! 스토어프론트 소셜 로그인 서비스 메인 애플리케이션
//!
//! MongoDB, Redis 연결과 `users` 컬렉션 인덱스를 준비한 뒤
//! actix-web 서버로 `/api/v1/auth`, `/api/v1/users` API를 제공합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use env_logger::Env;
use log::{error, info};
use storefront_auth::caching::redis::RedisClient;
use storefront_auth::config::{Environment, RateLimitConfig, ServerConfig};
use storefront_auth::core::registry::ServiceLocator;
use storefront_auth::db::Database;
use storefront_auth::errors::AppError;
use storefront_auth::repositories::users::user_repo::UserRepository;
use storefront_auth::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 스토어프론트 인증 서비스 시작 ({:?})", Environment::current());

    let (database, redis_client) = connect_data_stores().await?;

    // #[service] / #[repository] 싱글톤이 찾아 쓸 수 있도록 먼저 등록
    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    // 동시 가입 중복 방지는 유니크 인덱스에 달려 있으므로 서버보다 먼저 만든다
    UserRepository::instance()
        .create_indexes()
        .await
        .map_err(|e| io::Error::other(format!("users 인덱스 생성 실패: {}", e)))?;

    info!("✅ 모든 서비스가 초기화되었습니다");

    run_http_server().await
}

/// `PROFILE`(dev | prod)에 맞는 `.env.*` 파일을 읽습니다. 그 외 값이면 `.env`.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let filename = match profile.as_str() {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => ".env",
    };

    // 로거 초기화 전이라 결과는 stderr로만 남긴다
    if let Err(e) = dotenv::from_filename(filename) {
        eprintln!("{} 로드 실패 (profile: {}): {}", filename, profile, e);
    }
}

/// `RUST_LOG`가 없으면 `info,actix_web=info`
///
/// ```bash
/// RUST_LOG=storefront_auth::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

async fn connect_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    let database = Database::new().await.map_err(|e| {
        error!("MongoDB 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new().await.map_err(|e| {
        error!("Redis 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

async fn run_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(RateLimitConfig::per_second())
        .burst_size(RateLimitConfig::burst_size())
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting: 초당 {}요청, 버스트 {}개",
        RateLimitConfig::per_second(),
        RateLimitConfig::burst_size()
    );
    info!("🌐 http://{} 에서 실행중 (health: /health)", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(form_config())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// `CORS_ALLOWED_ORIGINS`의 스토어프론트 주소만 허용합니다.
///
/// 리다이렉트 방식 로그인은 쿠키로 세션을 주고받으므로 자격 증명을 허용합니다.
fn configure_cors() -> Cors {
    ServerConfig::allowed_origins()
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

// 추출 단계의 파싱 실패도 `{"success": false, "message": ...}` 400으로 응답

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(AppError::ValidationError(format!("요청 본문 형식이 올바르지 않습니다: {}", err)))
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(AppError::ValidationError(format!("쿼리 파라미터 형식이 올바르지 않습니다: {}", err)))
    })
}

fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        actix_web::Error::from(AppError::ValidationError(format!("폼 데이터 형식이 올바르지 않습니다: {}", err)))
    })
}
