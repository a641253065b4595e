//! # 회원 서비스
//!
//! 프로필 조회, 아이디·이메일 중복 확인, 약관 동의 저장을 담당합니다.

use std::sync::Arc;
use mongodb::bson::{doc, DateTime};
use singleton_macro::service;
use crate::{
    config::ConsentConfig,
    domain::{
        entities::users::user::User,
        dto::users::{
            request::{ConsentRequest, DuplicateCheckQuery},
            response::{ConsentResponse, DuplicateCheckResponse, FieldAvailability, UserProfileResponse},
        },
        models::oauth::verified_identity::normalize_email,
    },
    repositories::users::user_repo::UserRepository,
};
use crate::errors::{AppError, AppResult};

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    /// 토큰 갱신 등 세션 유지가 필요한 곳에서 사용합니다.
    pub async fn get_active_user(&self, id: &str) -> AppResult<User> {
        let user = self.get_user(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("사용자를 찾을 수 없습니다".to_string()),
            other => other,
        })?;

        if !user.is_active {
            return Err(AppError::Unauthorized("비활성화된 계정입니다".to_string()));
        }
        Ok(user)
    }

    pub async fn get_profile(&self, id: &str) -> AppResult<UserProfileResponse> {
        Ok(UserProfileResponse::from(self.get_user(id).await?))
    }

    /// 값이 주어진 필드만 조회합니다.
    pub async fn check_duplicate(&self, query: DuplicateCheckQuery) -> AppResult<DuplicateCheckResponse> {
        let username = match query.username {
            Some(username) => FieldAvailability::username(self.user_repo.username_exists(&username).await?),
            None => FieldAvailability::unchecked(),
        };

        let email = match query.email.as_deref().and_then(normalize_email) {
            Some(email) => FieldAvailability::email(self.user_repo.email_exists(&email).await?),
            None => FieldAvailability::unchecked(),
        };

        Ok(DuplicateCheckResponse { username, email })
    }

    /// 필수 두 항목에 동의해야 저장됩니다. 선택 항목은 요청값 그대로 덮어씁니다.
    pub async fn update_consent(&self, user_id: &str, request: ConsentRequest) -> AppResult<ConsentResponse> {
        request.validate_required()?;

        let updated = self.user_repo
            .update(
                user_id,
                doc! {
                    "terms_of_use": request.terms_of_use,
                    "personal_info_consent": request.personal_info_consent,
                    "sns_consent_to_receive": request.sns_consent_to_receive,
                    "email_consent_to_receive": request.email_consent_to_receive,
                    "updated_at": DateTime::now(),
                },
            )
            .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        log::info!("약관 동의 저장 - user: {}", user_id);

        Ok(ConsentResponse {
            success: true,
            message: "약관 동의가 완료되었습니다.".to_string(),
            redirect_url: ConsentConfig::default_redirect_path(),
        })
    }
}
