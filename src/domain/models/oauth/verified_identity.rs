//! 프로바이더 검증을 통과한 외부 신원 정보
//!
//! 각 프로바이더 검증기는 응답 형식이 달라도 결국 이 구조체 하나를 만들어 냅니다.
//! 계정 연동 로직은 이 구조체만 보고 동작합니다.

use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::{clean_optional_string, validate_required_string};

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub provider: SocialProvider,
    /// 프로바이더가 발급한 사용자 고유 식별자 (카카오 숫자 ID는 10진 문자열)
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

/// 이메일 비교는 대소문자를 구분하지 않으므로 저장 전에 소문자로 맞춥니다.
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

impl VerifiedIdentity {
    pub fn new(provider: SocialProvider, subject: impl Into<String>) -> Self {
        Self {
            provider,
            subject: subject.into(),
            email: None,
            display_name: None,
            nickname: None,
            avatar_url: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname;
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    /// 공백을 정리하고 필수 정보를 확인합니다.
    ///
    /// # Errors
    ///
    /// * 식별자가 비어 있으면 `ValidationError`
    /// * 이메일 필수 프로바이더인데 이메일이 없으면 `ValidationError`
    pub fn normalized(self) -> AppResult<Self> {
        let subject = validate_required_string(
            &self.subject,
            &format!("{} 사용자 식별 정보", self.provider.label()),
        )?;

        let email = self.email.as_deref().and_then(normalize_email);
        if email.is_none() && self.provider.requires_email() {
            return Err(AppError::ValidationError(format!(
                "{} 계정의 이메일 정보가 없습니다.",
                self.provider.label()
            )));
        }

        Ok(Self {
            provider: self.provider,
            subject,
            email,
            display_name: clean_optional_string(self.display_name),
            nickname: clean_optional_string(self.nickname),
            avatar_url: clean_optional_string(self.avatar_url),
        })
    }

    /// 신규 가입 시 사용자명의 기본값.
    ///
    /// 이메일 앞부분 → 닉네임 → 표시 이름 → `{provider}_user` 순으로 고르고
    /// 내부 공백은 `_`로 바꿉니다.
    pub fn username_base(&self) -> String {
        let candidate = self
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::to_string)
            .or_else(|| self.nickname.clone())
            .or_else(|| self.display_name.clone())
            .map(|raw| raw.split_whitespace().collect::<Vec<_>>().join("_"))
            .filter(|base| !base.is_empty());

        candidate.unwrap_or_else(|| format!("{}_user", self.provider.as_str()))
    }

    /// 표시 이름을 이름(첫 단어)과 성(나머지)으로 나눕니다.
    pub fn name_parts(&self) -> (String, String) {
        let name = self
            .display_name
            .as_deref()
            .or(self.nickname.as_deref())
            .unwrap_or_default();

        let mut words = name.split_whitespace();
        let first = words.next().unwrap_or_default().to_string();
        let last = words.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google(subject: &str, email: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity::new(SocialProvider::Google, subject)
            .with_email(email.map(str::to_string))
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let identity = google("g-1", Some("  Alice@Example.COM ")).normalized().unwrap();
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_blank_subject_is_rejected() {
        let result = google("   ", Some("alice@example.com")).normalized();
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_email_required_only_for_some_providers() {
        assert!(matches!(
            google("g-1", None).normalized(),
            Err(AppError::ValidationError(_))
        ));

        let kakao = VerifiedIdentity::new(SocialProvider::Kakao, "12345")
            .with_nickname(Some("춘식이".to_string()))
            .normalized()
            .unwrap();
        assert!(kakao.email.is_none());
    }

    #[test]
    fn test_username_base_prefers_email_local_part() {
        let identity = google("g-1", Some("alice@example.com"))
            .with_nickname(Some("ally".to_string()));
        assert_eq!(identity.username_base(), "alice");
    }

    #[test]
    fn test_username_base_falls_back_to_nickname_then_provider() {
        let with_nickname = VerifiedIdentity::new(SocialProvider::Kakao, "1")
            .with_nickname(Some("Kim  Min Su".to_string()));
        assert_eq!(with_nickname.username_base(), "Kim_Min_Su");

        let anonymous = VerifiedIdentity::new(SocialProvider::Apple, "001.abc");
        assert_eq!(anonymous.username_base(), "apple_user");
    }

    #[test]
    fn test_name_parts() {
        let identity = google("g-1", Some("a@b.c"))
            .with_display_name(Some("Alice Marie Smith".to_string()));
        assert_eq!(
            identity.name_parts(),
            ("Alice".to_string(), "Marie Smith".to_string())
        );

        let nameless = google("g-1", Some("a@b.c"));
        assert_eq!(nameless.name_parts(), (String::new(), String::new()));
    }
}
