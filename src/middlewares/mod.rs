//! 미들웨어 모듈
//!
//! ## AuthMiddleware
//!
//! 세션 액세스 토큰을 검증하고 [`AuthenticatedUser`](crate::domain::models::auth::authenticated_user::AuthenticatedUser)를
//! request extension에 넣습니다. 핸들러는 `AuthenticatedUser`를 인자로 받기만 하면 됩니다.
//!
//! - 토큰은 `Authorization: Bearer` 헤더를 먼저 보고, 없으면 `access_token` 쿠키를 봅니다.
//! - 리프레시 토큰은 세션으로 인정하지 않습니다.
//! - `required()`는 실패 시 401, 역할이 맞지 않으면 403을 `{"success": false, "message"}`로 응답합니다.
//! - `optional()`은 토큰이 없거나 틀려도 요청을 그대로 넘깁니다.
//!
//! ```rust,ignore
//! // 라우트 하나에만
//! #[get("/me", wrap = "AuthMiddleware::required()")]
//! pub async fn get_current_user(user: AuthenticatedUser) -> Result<HttpResponse, AppError> { ... }
//!
//! // 스코프 전체에
//! web::scope("/api/v1/admin").wrap(AuthMiddleware::required_with_role("admin"))
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
