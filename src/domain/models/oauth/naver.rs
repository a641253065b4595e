//! # 네이버 회원 프로필 모델
//!
//! `GET https://openapi.naver.com/v1/nid/me` 응답입니다.
//! HTTP 200이어도 `resultcode`가 `"00"`이 아니면 실패입니다.

use serde::Deserialize;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct NaverProfileResponse {
    pub resultcode: String,
    pub message: String,
    pub response: Option<NaverProfile>,
}

#[derive(Debug, Deserialize)]
pub struct NaverProfile {
    pub id: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

impl NaverProfileResponse {
    pub fn into_identity(self) -> AppResult<VerifiedIdentity> {
        if self.resultcode != "00" {
            return Err(AppError::ExternalServiceError(format!(
                "네이버 프로필 조회 실패: {} ({})",
                self.message, self.resultcode
            )));
        }

        let profile = self.response.ok_or_else(|| {
            AppError::ExternalServiceError("네이버 프로필 응답이 비어 있습니다".to_string())
        })?;

        Ok(VerifiedIdentity::new(SocialProvider::Naver, profile.id)
            .with_email(profile.email)
            .with_display_name(profile.name)
            .with_nickname(profile.nickname)
            .with_avatar_url(profile.profile_image))
    }
}
