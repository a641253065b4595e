//! # Google ID 토큰 모델
//!
//! Google Identity Services 버튼이 넘겨주는 `credential`(ID 토큰)과
//! 코드 플로우의 토큰 응답에 포함된 `id_token`은 모두
//! `https://oauth2.googleapis.com/tokeninfo`로 검증합니다.
//! tokeninfo는 숫자와 불리언을 문자열로 내려주므로 두 표현을 모두 받습니다.

use serde::Deserialize;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::{deserialize_flexible_bool, deserialize_flexible_i64};

/// 허용하는 토큰 발급자
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// tokeninfo 응답 (검증된 ID 토큰 클레임)
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    #[serde(deserialize_with = "deserialize_flexible_i64")]
    pub exp: i64,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleIdTokenClaims {
    /// 발급자, 대상, 만료, 이메일 인증 여부를 확인합니다.
    pub fn validate(&self, client_id: &str, now: i64) -> AppResult<()> {
        if !GOOGLE_ISSUERS.contains(&self.iss.as_str()) {
            return Err(AppError::AuthenticationError("잘못된 토큰 발급자입니다".to_string()));
        }

        if self.aud != client_id {
            return Err(AppError::AuthenticationError("토큰 대상이 일치하지 않습니다".to_string()));
        }

        if self.exp <= now {
            return Err(AppError::AuthenticationError("Google 토큰이 만료되었습니다".to_string()));
        }

        if self.email.is_some() && self.email_verified != Some(true) {
            return Err(AppError::AuthenticationError(
                "이메일 인증이 완료되지 않은 Google 계정입니다".to_string(),
            ));
        }

        Ok(())
    }

    pub fn into_identity(self) -> VerifiedIdentity {
        let display_name = self.name.or_else(|| {
            match (self.given_name, self.family_name) {
                (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
                (given, family) => given.or(family),
            }
        });

        VerifiedIdentity::new(SocialProvider::Google, self.sub)
            .with_email(self.email)
            .with_display_name(display_name)
            .with_avatar_url(self.picture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_ID: &str = "storefront.apps.googleusercontent.com";
    const NOW: i64 = 1_700_000_000;

    fn claims_json(iss: &str) -> String {
        format!(
            r#"{{
                "iss": "{}",
                "sub": "110248495921238986420",
                "aud": "{}",
                "exp": "1700003600",
                "email": "Alice@Example.com",
                "email_verified": "true",
                "name": "Alice Kim",
                "picture": "https://lh3.googleusercontent.com/a/photo.jpg"
            }}"#,
            iss, CLIENT_ID
        )
    }

    #[test]
    fn test_valid_tokeninfo_claims() {
        let claims: GoogleIdTokenClaims = serde_json::from_str(&claims_json("accounts.google.com")).unwrap();
        assert!(claims.validate(CLIENT_ID, NOW).is_ok());

        let identity = claims.into_identity();
        assert_eq!(identity.provider, SocialProvider::Google);
        assert_eq!(identity.subject, "110248495921238986420");
        assert_eq!(identity.display_name.as_deref(), Some("Alice Kim"));
    }

    #[test]
    fn test_https_issuer_is_accepted() {
        let claims: GoogleIdTokenClaims =
            serde_json::from_str(&claims_json("https://accounts.google.com")).unwrap();
        assert!(claims.validate(CLIENT_ID, NOW).is_ok());
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let claims: GoogleIdTokenClaims =
            serde_json::from_str(&claims_json("https://evil.example.com")).unwrap();
        let result = claims.validate(CLIENT_ID, NOW);
        assert!(matches!(result, Err(AppError::AuthenticationError(msg)) if msg.contains("발급자")));
    }

    #[test]
    fn test_audience_and_expiry() {
        let claims: GoogleIdTokenClaims = serde_json::from_str(&claims_json("accounts.google.com")).unwrap();
        assert!(claims.validate("another-client", NOW).is_err());
        assert!(claims.validate(CLIENT_ID, 1_700_003_600).is_err());
    }

    #[test]
    fn test_unverified_email_is_rejected() {
        let mut claims: GoogleIdTokenClaims =
            serde_json::from_str(&claims_json("accounts.google.com")).unwrap();
        claims.email_verified = Some(false);
        assert!(claims.validate(CLIENT_ID, NOW).is_err());
    }

    #[test]
    fn test_name_built_from_parts() {
        let mut claims: GoogleIdTokenClaims =
            serde_json::from_str(&claims_json("accounts.google.com")).unwrap();
        claims.name = None;
        claims.given_name = Some("Alice".to_string());
        claims.family_name = Some("Kim".to_string());
        assert_eq!(claims.into_identity().display_name.as_deref(), Some("Alice Kim"));
    }
}
