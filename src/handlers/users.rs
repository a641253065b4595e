//! # User HTTP Handlers
//!
//! 가입 직후 약관 동의와 회원 정보 중복 확인을 처리합니다.
//!
//! | 메서드 | 경로 | 설명 | 인증 |
//! |--------|------|------|------|
//! | `GET` | `/users/check-duplicate?username=&email=` | 아이디·이메일 사용 가능 여부 | 불필요 |
//! | `POST` | `/users/consent` | 약관 동의 저장 | 필요 |

use actix_web::{get, post, web, HttpResponse};
use crate::domain::dto::users::request::{ConsentRequest, DuplicateCheckQuery};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::AuthMiddleware;
use crate::services::users::user_service::UserService;

/// 회원 정보 중복 확인
///
/// 비어 있는 필드는 확인하지 않고 사용 가능으로 응답합니다.
#[get("/check-duplicate")]
pub async fn check_duplicate(
    query: web::Query<DuplicateCheckQuery>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .check_duplicate(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 약관 동의 저장
///
/// 필수 항목(이용약관, 개인정보 수집·이용)이 빠지면 400입니다.
#[post("/consent", wrap = "AuthMiddleware::required()")]
pub async fn update_consent(
    user: AuthenticatedUser,
    payload: web::Json<ConsentRequest>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance()
        .update_consent(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
