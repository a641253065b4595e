//! 약관 동의 및 중복 확인 요청 DTO

use serde::Deserialize;
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::deserialize_optional_string;

pub const REQUIRED_CONSENT_MESSAGE: &str = "필수 동의 항목에 모두 동의해주세요.";

/// 약관 동의 요청. 누락된 항목은 동의하지 않은 것으로 봅니다.
#[derive(Debug, Default, Deserialize)]
pub struct ConsentRequest {
    #[serde(default)]
    pub terms_of_use: bool,
    #[serde(default)]
    pub personal_info_consent: bool,
    #[serde(default)]
    pub sns_consent_to_receive: bool,
    #[serde(default)]
    pub email_consent_to_receive: bool,
}

impl ConsentRequest {
    pub fn validate_required(&self) -> AppResult<()> {
        if self.terms_of_use && self.personal_info_consent {
            Ok(())
        } else {
            Err(AppError::ValidationError(REQUIRED_CONSENT_MESSAGE.to_string()))
        }
    }
}

/// `GET /api/v1/users/check-duplicate?username=&email=`
#[derive(Debug, Default, Deserialize)]
pub struct DuplicateCheckQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
}
