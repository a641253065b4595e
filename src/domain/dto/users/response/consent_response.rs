use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentResponse {
    pub success: bool,
    pub message: String,
    pub redirect_url: String,
}

/// 필드 하나의 사용 가능 여부. 값이 비어 있으면 메시지도 비웁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAvailability {
    pub available: bool,
    pub message: String,
}

impl FieldAvailability {
    pub fn unchecked() -> Self {
        Self { available: true, message: String::new() }
    }

    pub fn username(taken: bool) -> Self {
        if taken {
            Self { available: false, message: "이미 존재하는 아이디입니다.".to_string() }
        } else {
            Self { available: true, message: "사용 가능한 아이디입니다.".to_string() }
        }
    }

    pub fn email(taken: bool) -> Self {
        if taken {
            Self { available: false, message: "이미 가입된 이메일입니다.".to_string() }
        } else {
            Self { available: true, message: "사용 가능한 이메일입니다.".to_string() }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckResponse {
    pub username: FieldAvailability,
    pub email: FieldAvailability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchecked_field_is_available_without_message() {
        let field = FieldAvailability::unchecked();
        assert!(field.available);
        assert!(field.message.is_empty());
    }

    #[test]
    fn test_username_and_email_messages() {
        assert_eq!(
            FieldAvailability::username(true),
            FieldAvailability { available: false, message: "이미 존재하는 아이디입니다.".to_string() }
        );
        assert_eq!(FieldAvailability::username(false).message, "사용 가능한 아이디입니다.");
        assert!(FieldAvailability::username(false).available);

        assert_eq!(
            FieldAvailability::email(true),
            FieldAvailability { available: false, message: "이미 가입된 이메일입니다.".to_string() }
        );
        assert_eq!(FieldAvailability::email(false).message, "사용 가능한 이메일입니다.");
    }

    #[test]
    fn test_duplicate_check_response_shape() {
        let body = serde_json::to_value(DuplicateCheckResponse {
            username: FieldAvailability::username(true),
            email: FieldAvailability::unchecked(),
        })
        .unwrap();
        assert_eq!(body["username"]["available"], false);
        assert_eq!(body["email"]["available"], true);
        assert_eq!(body["email"]["message"], "");
    }
}
