/// 인증 모드를 정의하는 열거형
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 인증이 반드시 필요함
    Required,
    /// 인증이 선택사항임 (있으면 검증, 없어도 허용)
    Optional,
}

/// 요구되는 역할 정보
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(String),
    /// 여러 역할 중 하나라도 맞으면 허용
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, user_role: &str) -> bool {
        match self {
            RequiredRole::Single(required_role) => required_role == user_role,
            RequiredRole::Any(required_roles) => {
                required_roles.iter().any(|role| role == user_role)
            }
        }
    }
}
