use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime;
use crate::domain::entities::users::user::{User, UserRole};
use crate::domain::models::token::token::TokenPair;

/// 로그인 응답에 포함되는 사용자 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// `GET /api/v1/auth/me` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub profile_image: Option<String>,
    /// 연결된 프로바이더 (`google`, `kakao`, ...)
    pub linked_providers: Vec<String>,
    pub terms_of_use: bool,
    pub personal_info_consent: bool,
    pub sns_consent_to_receive: bool,
    pub email_consent_to_receive: bool,
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        let linked_providers = crate::domain::models::oauth::SocialProvider::ALL
            .iter()
            .filter(|provider| user.provider_id(**provider).is_some())
            .map(|provider| provider.as_str().to_string())
            .collect();

        Self {
            user: UserResponse::from(&user),
            profile_image: user.profile_image,
            linked_providers,
            terms_of_use: user.terms_of_use,
            personal_info_consent: user.personal_info_consent,
            sns_consent_to_receive: user.sns_consent_to_receive,
            email_consent_to_receive: user.email_consent_to_receive,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// 로그인 응답 DTO (JWT 토큰 포함)
///
/// 필수 동의가 빠진 사용자는 `requires_consent`가 true이고
/// `redirect_url`이 동의 페이지를 가리킵니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub redirect_url: String,
    pub requires_consent: bool,
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl LoginResponse {
    pub fn new(user: &User, tokens: TokenPair, message: String, redirect_url: String) -> Self {
        Self {
            success: true,
            message,
            redirect_url,
            requires_consent: !user.has_required_consents(),
            user: UserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// 리다이렉트 방식 로그인 시작 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthLoginUrlResponse {
    pub login_url: String,
    pub state: String,
}
