//! User Entity Implementation
//!
//! 스토어프론트 회원 엔티티입니다.
//! 프로바이더마다 외부 식별자 필드를 하나씩 두며, 한 계정에 여러 프로바이더를 연결할 수 있습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;

/// 회원 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }
}

/// 사용자 엔티티
///
/// `email`과 각 프로바이더 ID 필드는 값이 없으면 아예 저장하지 않습니다.
/// sparse 유니크 인덱스가 `null` 값끼리 충돌하지 않게 하려는 것입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 소문자로 정규화된 이메일 (unique, sparse)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 사용자 이름 (unique)
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// 소셜 가입자는 항상 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kakao_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apple_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub is_active: bool,

    /// 이용약관 동의 (필수)
    #[serde(default)]
    pub terms_of_use: bool,
    /// 개인정보 수집·이용 동의 (필수)
    #[serde(default)]
    pub personal_info_consent: bool,
    /// SNS 수신 동의 (선택)
    #[serde(default)]
    pub sns_consent_to_receive: bool,
    /// 이메일 수신 동의 (선택)
    #[serde(default)]
    pub email_consent_to_receive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 소셜 로그인으로 처음 들어온 사용자를 만듭니다.
    ///
    /// 동의 항목은 프로바이더와 무관하게 모두 `false`로 시작합니다.
    pub fn new_social(identity: &VerifiedIdentity, username: String) -> Self {
        let now = DateTime::now();
        let (first_name, last_name) = identity.name_parts();

        let mut user = Self {
            id: None,
            email: identity.email.clone(),
            username,
            first_name,
            last_name,
            password_hash: None,
            google_id: None,
            kakao_id: None,
            naver_id: None,
            apple_id: None,
            profile_image: identity.avatar_url.clone(),
            role: UserRole::Customer,
            is_active: true,
            terms_of_use: false,
            personal_info_consent: false,
            sns_consent_to_receive: false,
            email_consent_to_receive: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        user.set_provider_id(identity.provider, identity.subject.clone());
        user
    }

    pub fn provider_id(&self, provider: SocialProvider) -> Option<&str> {
        match provider {
            SocialProvider::Google => self.google_id.as_deref(),
            SocialProvider::Kakao => self.kakao_id.as_deref(),
            SocialProvider::Naver => self.naver_id.as_deref(),
            SocialProvider::Apple => self.apple_id.as_deref(),
        }
    }

    pub fn set_provider_id(&mut self, provider: SocialProvider, subject: String) {
        let slot = match provider {
            SocialProvider::Google => &mut self.google_id,
            SocialProvider::Kakao => &mut self.kakao_id,
            SocialProvider::Naver => &mut self.naver_id,
            SocialProvider::Apple => &mut self.apple_id,
        };
        *slot = Some(subject);
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 필수 동의 두 항목을 모두 받았는지
    pub fn has_required_consents(&self) -> bool {
        self.terms_of_use && self.personal_info_consent
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
