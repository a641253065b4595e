//! Authentication HTTP Handlers
//!
//! 소셜 로그인과 세션 토큰 관련 엔드포인트입니다.
//!
//! # 로그인 방식
//!
//! - **JSON 방식**: 프론트엔드 SDK가 받은 자격 증명을 그대로 전달합니다.
//!   (`POST /auth/google`, `POST /auth/kakao`) 토큰은 응답 본문으로 내려갑니다.
//! - **리다이렉트 방식**: `GET /auth/{provider}/login`으로 인가 URL을 받고,
//!   프로바이더가 콜백을 호출하면 토큰을 쿠키에 담아 `next`로 302 응답합니다.
//!
//! 두 방식 모두 필수 약관에 동의하지 않은 사용자는 동의 페이지로 보냅니다.
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::config::{ConsentConfig, Environment, JwtConfig};
use crate::domain::dto::users::request::{
    AppleCallbackForm, GoogleLoginRequest, KakaoLoginRequest, NextQuery, OAuthCallbackQuery,
    RefreshTokenRequest,
};
use crate::domain::dto::users::response::LoginResponse;
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::token::token::TokenPair;
use crate::errors::AppError;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::{
    OAuthCallback, SocialAuthService, SocialLogin, TokenService, ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE,
};
use crate::services::users::user_service::UserService;
use crate::utils::redirect::{safe_redirect_target, RequestOrigin};

/// 로그인 직후 이동할 경로
///
/// 필수 동의가 없으면 `next`와 상관없이 동의 페이지입니다.
pub fn post_login_target(user: &User, next: Option<&str>, origin: RequestOrigin<'_>) -> String {
    if !user.has_required_consents() {
        return ConsentConfig::consent_page_path();
    }

    safe_redirect_target(next, origin, &ConsentConfig::default_redirect_path())
}

/// HttpOnly, SameSite=Lax 세션 쿠키
pub fn session_cookie(name: &'static str, value: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_seconds))
        .finish()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

fn token_cookies(tokens: &TokenPair) -> [Cookie<'static>; 2] {
    let secure = Environment::current().requires_secure_cookies();
    [
        session_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone(), tokens.expires_in, secure),
        session_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            JwtConfig::refresh_expiration_days() * 24 * 3600,
            secure,
        ),
    ]
}

fn parse_provider(provider: &str) -> Result<SocialProvider, AppError> {
    SocialProvider::from_str(provider).map_err(AppError::NotFound)
}

fn json_login(req: &HttpRequest, login: SocialLogin, next: Option<&str>) -> HttpResponse {
    let info = req.connection_info().clone();
    let origin = RequestOrigin { host: info.host(), secure: info.scheme() == "https" };
    let redirect_url = post_login_target(&login.user, next, origin);

    log::info!(
        "{} 로그인 성공 - user: {} ({:?})",
        login.provider,
        login.user.username,
        login.outcome
    );

    let message = login.message();
    HttpResponse::Ok().json(LoginResponse::new(&login.user, login.tokens, message, redirect_url))
}

fn redirect_login(req: &HttpRequest, login: SocialLogin) -> HttpResponse {
    let info = req.connection_info().clone();
    let origin = RequestOrigin { host: info.host(), secure: info.scheme() == "https" };
    let target = post_login_target(&login.user, login.next.as_deref(), origin);

    log::info!(
        "{} 로그인 성공 - user: {} ({:?}), 이동: {}",
        login.provider,
        login.user.username,
        login.outcome,
        target
    );

    let [access, refresh] = token_cookies(&login.tokens);
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .cookie(access)
        .cookie(refresh)
        .finish()
}

/// Google Identity Services 로그인
///
/// # Endpoint
/// `POST /auth/google?next=/profile/`
#[post("/google")]
pub async fn google_login(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    payload: web::Json<GoogleLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let login = SocialAuthService::instance()
        .login_with_google_credential(&payload.credential)
        .await?;

    Ok(json_login(&req, login, query.next.as_deref()))
}

/// 카카오 JS SDK 로그인
///
/// # Endpoint
/// `POST /auth/kakao?next=/profile/`
#[post("/kakao")]
pub async fn kakao_login(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    payload: web::Json<KakaoLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let login = SocialAuthService::instance()
        .login_with_kakao_token(&payload.access_token)
        .await?;

    Ok(json_login(&req, login, query.next.as_deref()))
}

/// 리다이렉트 방식 인가 URL 발급
///
/// `next`는 state와 함께 저장되었다가 콜백에서 사용됩니다.
///
/// # Endpoint
/// `GET /auth/{provider}/login?next=/profile/`
#[get("/{provider}/login")]
pub async fn oauth_login_url(
    provider: web::Path<String>,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = parse_provider(&provider)?;

    let response = SocialAuthService::instance()
        .login_url(provider, query.into_inner().next)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Google·카카오·네이버 OAuth 콜백
///
/// # Endpoint
/// `GET /auth/{provider}/callback?code={code}&state={state}`
#[get("/{provider}/callback")]
pub async fn oauth_callback(
    req: HttpRequest,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = parse_provider(&provider)?;
    if provider == SocialProvider::Apple {
        return Err(AppError::ValidationError(
            "Apple 로그인은 form_post 콜백만 지원합니다".to_string(),
        ));
    }

    let (code, state) = query.into_inner().into_code_and_state().map_err(|e| {
        log::warn!("{} OAuth 콜백 오류: {}", provider, e);
        e
    })?;

    let login = SocialAuthService::instance()
        .login_with_callback(provider, OAuthCallback { code, state, apple_user: None })
        .await?;

    Ok(redirect_login(&req, login))
}

/// Sign in with Apple 콜백 (`response_mode=form_post`)
///
/// # Endpoint
/// `POST /auth/apple/callback`
#[post("/apple/callback")]
pub async fn apple_callback(
    req: HttpRequest,
    form: web::Form<AppleCallbackForm>,
) -> Result<HttpResponse, AppError> {
    let (code, state, apple_user) = form.into_inner().into_parts().map_err(|e| {
        log::warn!("Apple OAuth 콜백 오류: {}", e);
        e
    })?;

    let login = SocialAuthService::instance()
        .login_with_callback(SocialProvider::Apple, OAuthCallback { code, state, apple_user })
        .await?;

    Ok(redirect_login(&req, login))
}

/// 토큰 갱신 엔드포인트
///
/// 쿠키로 받은 리프레시 토큰이면 새 토큰도 쿠키로 돌려줍니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh_tokens(
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, AppError> {
    let token_service = TokenService::instance();
    let user_service = UserService::instance();

    let from_cookie = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());
    let via_cookie = from_cookie.is_some();

    let refresh_token = match from_cookie {
        Some(token) => token,
        None => {
            let body = body.ok_or_else(|| {
                AppError::Unauthorized("리프레시 토큰이 제공되지 않았습니다".to_string())
            })?;
            body.validate()
                .map_err(|e| AppError::ValidationError(e.to_string()))?;
            body.into_inner().refresh_token
        }
    };

    let claims = token_service.consume_refresh_token(&refresh_token).await?;
    let user = user_service.get_active_user(&claims.sub).await?;
    let tokens = token_service.issue_session(&user, claims.provider).await?;

    log::info!("토큰 갱신 성공: 사용자 ID {}", claims.sub);

    let mut response = HttpResponse::Ok();
    if via_cookie {
        let [access, refresh] = token_cookies(&tokens);
        response.cookie(access).cookie(refresh);
    }

    Ok(response.json(json!({
        "success": true,
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "expires_in": tokens.expires_in,
        "token_type": tokens.token_type
    })))
}

/// 로그아웃
///
/// 저장된 리프레시 토큰을 폐기하고 세션 쿠키를 지웁니다.
/// 이미 발급된 액세스 토큰은 만료될 때까지 유효합니다.
///
/// # Endpoint
/// `POST /auth/logout`
#[post("/logout", wrap = "AuthMiddleware::required()")]
pub async fn logout(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    TokenService::instance().revoke(&user.user_id).await?;

    log::info!("로그아웃: 사용자 ID {}", user.user_id);

    let secure = Environment::current().requires_secure_cookies();
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE, secure))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE, secure))
        .json(json!({
            "success": true,
            "message": "로그아웃되었습니다."
        })))
}

/// 현재 인증된 사용자 정보 조회
///
/// # Endpoint
/// `GET /auth/me`
#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn get_current_user(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = UserService::instance().get_profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
