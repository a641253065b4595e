use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::social_provider::SocialProvider;

/// JWT 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID
    pub user_id: String,

    /// 토큰을 발급받을 때 사용한 프로바이더
    pub provider: SocialProvider,

    /// `customer` 또는 `admin`
    pub role: String,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_user_from_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser {
            user_id: "65f0c0ffee".to_string(),
            provider: SocialProvider::Naver,
            role: "customer".to_string(),
        });

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, "65f0c0ffee");
        assert!(!user.is_admin());
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthenticatedUser::extract(&req).await.is_err());
    }
}
