//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::config::JwtConfig;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::domain::models::token::token::TokenType;
use crate::errors::{AppError, AppResult};
use crate::services::auth::token_service::{extract_bearer_token, verify_signed_token, ACCESS_TOKEN_COOKIE};

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate_request(&req);

            match (&mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {} ({})", err, req.path());
                    return Ok(reject(req, HttpResponse::Unauthorized(), "유효한 인증 토큰이 필요합니다"));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(&user.role) {
                            log::warn!(
                                "권한 부족: 사용자 ID {} ({}), 필요 권한: {:?}",
                                user.user_id, user.role, required
                            );
                            return Ok(reject(req, HttpResponse::Forbidden(), "접근 권한이 부족합니다"));
                        }
                    }

                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    let allowed = required_role
                        .as_ref()
                        .map_or(true, |required| required.is_satisfied(&user.role));

                    if allowed {
                        log::debug!("선택적 인증 성공: 사용자 ID {}", user.user_id);
                        req.extensions_mut().insert(user);
                    } else {
                        log::debug!("선택적 인증: 권한 부족하지만 진행 허용");
                    }
                }
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(
    req: ServiceRequest,
    mut builder: actix_web::HttpResponseBuilder,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = builder.json(serde_json::json!({
        "success": false,
        "message": message
    }));
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// `Authorization` 헤더, 없으면 `access_token` 쿠키에서 토큰을 찾습니다.
///
/// 리다이렉트 방식 로그인은 토큰을 쿠키로만 내려주기 때문에 둘 다 확인합니다.
fn request_token(req: &ServiceRequest) -> AppResult<String> {
    if let Some(auth_header) = req.headers().get("Authorization") {
        let auth_header = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("유효하지 않은 인증 헤더 형식입니다".to_string()))?;
        return extract_bearer_token(auth_header).map(str::to_string);
    }

    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("인증 토큰이 없습니다".to_string()))
}

fn authenticate_request(req: &ServiceRequest) -> AppResult<AuthenticatedUser> {
    let token = request_token(req)?;
    let claims = verify_signed_token(&token, TokenType::Access, &JwtConfig::secret())?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        provider: claims.provider,
        role: claims.role,
    })
}
