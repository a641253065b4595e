//! 지원하는 소셜 로그인 프로바이더

use std::fmt;
use serde::{Deserialize, Serialize};

/// 외부 인증 프로바이더
///
/// 사용자 문서에는 프로바이더마다 별도의 식별자 필드(`google_id` 등)가 있으며,
/// 필드 이름은 [`SocialProvider::id_field`]로 얻습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Kakao,
    Naver,
    Apple,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 4] = [
        SocialProvider::Google,
        SocialProvider::Kakao,
        SocialProvider::Naver,
        SocialProvider::Apple,
    ];

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(SocialProvider::Google),
            "kakao" => Ok(SocialProvider::Kakao),
            "naver" => Ok(SocialProvider::Naver),
            "apple" => Ok(SocialProvider::Apple),
            _ => Err(format!("Unsupported social provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google",
            SocialProvider::Kakao => "kakao",
            SocialProvider::Naver => "naver",
            SocialProvider::Apple => "apple",
        }
    }

    /// 사용자 문서에서 외부 식별자를 저장하는 필드 이름
    pub fn id_field(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google_id",
            SocialProvider::Kakao => "kakao_id",
            SocialProvider::Naver => "naver_id",
            SocialProvider::Apple => "apple_id",
        }
    }

    /// 사용자에게 보여줄 이름
    pub fn label(&self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::Kakao => "카카오",
            SocialProvider::Naver => "네이버",
            SocialProvider::Apple => "Apple",
        }
    }

    /// 이메일이 없으면 로그인을 거부하는 프로바이더인지 여부.
    /// 카카오는 이메일 제공 동의가 선택 항목이고, Apple은 최초 로그인 이후 이메일을 생략할 수 있습니다.
    pub fn requires_email(&self) -> bool {
        matches!(self, SocialProvider::Google | SocialProvider::Naver)
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
