//! # Sign in with Apple 모델
//!
//! - 클라이언트 시크릿(ES256 JWT) 클레임
//! - `https://appleid.apple.com/auth/keys` JWKS
//! - ID 토큰 클레임
//! - 최초 로그인 때만 form_post로 전달되는 `user` JSON

use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::utils::string_utils::{deserialize_flexible_bool, deserialize_flexible_i64};

/// 클라이언트 시크릿 유효 시간 (초)
pub const APPLE_CLIENT_SECRET_TTL_SECONDS: i64 = 600;

#[derive(Debug, Serialize)]
pub struct AppleClientSecretClaims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
    pub sub: String,
}

impl AppleClientSecretClaims {
    pub fn new(team_id: &str, client_id: &str, issuer: &str, now: i64) -> Self {
        Self {
            iss: team_id.to_string(),
            iat: now,
            exp: now + APPLE_CLIENT_SECRET_TTL_SECONDS,
            aud: issuer.to_string(),
            sub: client_id.to_string(),
        }
    }
}

/// 서명 키 하나. `apple_jwks:{kid}`로 캐시되므로 직렬화도 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppleJwk {
    pub kty: String,
    pub kid: String,
    pub alg: String,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Deserialize)]
pub struct AppleJwks {
    pub keys: Vec<AppleJwk>,
}

impl AppleJwks {
    pub fn find(&self, kid: &str) -> Option<&AppleJwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

/// 서명 검증을 통과한 ID 토큰 클레임. `email_verified`는 문자열로 오기도 합니다.
#[derive(Debug, Deserialize)]
pub struct AppleIdTokenClaims {
    pub sub: String,
    #[serde(deserialize_with = "deserialize_flexible_i64")]
    pub exp: i64,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub email_verified: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub is_private_email: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleUserName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppleUserPayload {
    pub name: Option<AppleUserName>,
    pub email: Option<String>,
}

impl AppleUserPayload {
    /// 잘못된 JSON은 무시합니다. 이름은 부가 정보일 뿐입니다.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    pub fn full_name(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        let joined = [name.first_name.as_deref(), name.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() { None } else { Some(joined) }
    }
}

impl AppleIdTokenClaims {
    /// 토큰의 이메일을 우선하고, 토큰에 없을 때만 form 값으로 보완합니다.
    pub fn into_identity(self, user: &AppleUserPayload) -> VerifiedIdentity {
        let email = self
            .email
            .filter(|_| self.email_verified != Some(false))
            .or_else(|| user.email.clone());

        VerifiedIdentity::new(SocialProvider::Apple, self.sub)
            .with_email(email)
            .with_display_name(user.full_name())
    }
}
