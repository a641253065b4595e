//! # 카카오 사용자 정보 모델
//!
//! `GET https://kapi.kakao.com/v2/user/me` 응답입니다.
//! 프로필 정보는 `kakao_account.profile`에 있고, 오래된 앱은 `properties`에만 내려옵니다.

use serde::Deserialize;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;

#[derive(Debug, Deserialize)]
pub struct KakaoUserInfo {
    pub id: i64,
    #[serde(default)]
    pub kakao_account: Option<KakaoAccount>,
    #[serde(default)]
    pub properties: Option<KakaoProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoAccount {
    pub email: Option<String>,
    pub is_email_valid: Option<bool>,
    pub is_email_verified: Option<bool>,
    pub profile: Option<KakaoProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoProfile {
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoProperties {
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
}

impl KakaoUserInfo {
    /// 카카오가 유효하지 않거나 미인증이라고 표시한 이메일은 계정 연동에 쓰지 않습니다.
    pub fn into_identity(self) -> VerifiedIdentity {
        let account = self.kakao_account.unwrap_or_default();
        let properties = self.properties.unwrap_or_default();
        let profile = account.profile.unwrap_or_default();

        let email_usable =
            account.is_email_valid != Some(false) && account.is_email_verified != Some(false);
        let email = account.email.filter(|_| email_usable);

        let nickname = profile.nickname.or(properties.nickname);
        let avatar_url = profile.profile_image_url.or(properties.profile_image);

        VerifiedIdentity::new(SocialProvider::Kakao, self.id.to_string())
            .with_email(email)
            .with_display_name(nickname.clone())
            .with_nickname(nickname)
            .with_avatar_url(avatar_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile() {
        let info: KakaoUserInfo = serde_json::from_str(
            r#"{
                "id": 3141592653,
                "connected_at": "2024-01-01T00:00:00Z",
                "kakao_account": {
                    "email": "chunsik@kakao.com",
                    "is_email_valid": true,
                    "is_email_verified": true,
                    "profile": {
                        "nickname": "춘식이",
                        "profile_image_url": "http://k.kakaocdn.net/img.jpg"
                    }
                }
            }"#,
        )
        .unwrap();

        let identity = info.into_identity();
        assert_eq!(identity.subject, "3141592653");
        assert_eq!(identity.email.as_deref(), Some("chunsik@kakao.com"));
        assert_eq!(identity.nickname.as_deref(), Some("춘식이"));
        assert_eq!(identity.avatar_url.as_deref(), Some("http://k.kakaocdn.net/img.jpg"));
    }

    #[test]
    fn test_legacy_properties_and_missing_email() {
        let info: KakaoUserInfo = serde_json::from_str(
            r#"{"id": 42, "properties": {"nickname": "라이언", "profile_image": "http://img"}}"#,
        )
        .unwrap();

        let identity = info.into_identity();
        assert_eq!(identity.subject, "42");
        assert!(identity.email.is_none());
        assert_eq!(identity.nickname.as_deref(), Some("라이언"));
        assert_eq!(identity.avatar_url.as_deref(), Some("http://img"));
    }

    #[test]
    fn test_unverified_email_is_dropped() {
        let info: KakaoUserInfo = serde_json::from_str(
            r#"{"id": 7, "kakao_account": {"email": "x@kakao.com", "is_email_verified": false}}"#,
        )
        .unwrap();

        assert!(info.into_identity().email.is_none());
    }
}
