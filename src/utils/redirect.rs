//! # 로그인 후 이동 경로 검증
//!
//! `next` 파라미터를 그대로 따라가면 외부 사이트로 보내는 오픈 리다이렉트가 됩니다.
//! 아래 두 경우만 허용하고 나머지는 기본 경로로 대체합니다.
//!
//! - `/`로 시작하는 같은 호스트 경로 (`//`로 시작하면 다른 호스트이므로 거부)
//! - 요청 호스트와 `host[:port]`가 같은 `http(s)` 절대 URL (HTTPS 요청이면 `https`만)
//!
//! 역슬래시는 브라우저가 `/`로 해석하므로 먼저 바꿔 놓고 검사합니다.

use reqwest::Url;

/// 요청의 호스트 정보
#[derive(Debug, Clone, Copy)]
pub struct RequestOrigin<'a> {
    /// `Host` 헤더 값 (`shop.example.com`, `localhost:8080`)
    pub host: &'a str,
    pub secure: bool,
}

fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// 허용되는 값이면 정규화된 경로를 돌려줍니다.
pub fn validate_next(next: &str, origin: RequestOrigin<'_>) -> Option<String> {
    let trimmed = next.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return None;
    }

    let normalized = trimmed.replace('\\', "/");

    if normalized.starts_with('/') {
        return (!normalized.starts_with("//")).then_some(normalized);
    }

    let url = Url::parse(&normalized).ok()?;

    let scheme_ok = match url.scheme() {
        "https" => true,
        "http" => !origin.secure,
        _ => false,
    };
    if !scheme_ok || !url.username().is_empty() || url.password().is_some() {
        return None;
    }

    let same_host = authority(&url)?.eq_ignore_ascii_case(origin.host);
    same_host.then_some(normalized)
}

/// 검증에 실패하거나 값이 없으면 `fallback`을 돌려줍니다.
pub fn safe_redirect_target(next: Option<&str>, origin: RequestOrigin<'_>, fallback: &str) -> String {
    match next.and_then(|value| validate_next(value, origin)) {
        Some(target) => target,
        None => {
            if let Some(rejected) = next.filter(|value| !value.trim().is_empty()) {
                log::warn!("허용되지 않은 next 값을 무시합니다: {:?}", rejected);
            }
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTTP: RequestOrigin<'static> = RequestOrigin { host: "shop.example.com", secure: false };
    const HTTPS: RequestOrigin<'static> = RequestOrigin { host: "shop.example.com", secure: true };

    #[test]
    fn test_relative_paths_are_allowed() {
        assert_eq!(validate_next("/profile/", HTTP).as_deref(), Some("/profile/"));
        assert_eq!(validate_next("/products/3/?tab=reviews", HTTPS).as_deref(), Some("/products/3/?tab=reviews"));
    }

    #[test]
    fn test_foreign_hosts_are_rejected() {
        assert!(validate_next("https://evil.com/", HTTP).is_none());
        assert!(validate_next("//evil.com/", HTTP).is_none());
        assert!(validate_next("/\\evil.com", HTTP).is_none());
        assert!(validate_next("\\\\evil.com", HTTP).is_none());
        assert!(validate_next("https://shop.example.com.evil.com/", HTTP).is_none());
        assert!(validate_next("https://shop.example.com@evil.com/", HTTP).is_none());
    }

    #[test]
    fn test_same_host_absolute_urls() {
        assert!(validate_next("https://shop.example.com/cart/", HTTPS).is_some());
        assert!(validate_next("http://shop.example.com/cart/", HTTP).is_some());
        assert!(validate_next("http://shop.example.com/cart/", HTTPS).is_none());
        assert!(validate_next("https://shop.example.com:8443/", HTTPS).is_none());

        let local = RequestOrigin { host: "localhost:8080", secure: false };
        assert!(validate_next("http://localhost:8080/cart/", local).is_some());
        assert!(validate_next("http://localhost/cart/", local).is_none());
    }

    #[test]
    fn test_dangerous_values_are_rejected() {
        assert!(validate_next("javascript:alert(1)", HTTP).is_none());
        assert!(validate_next("/cart/\n/evil", HTTP).is_none());
        assert!(validate_next("cart/", HTTP).is_none());
        assert!(validate_next("   ", HTTP).is_none());
    }

    #[test]
    fn test_fallback() {
        assert_eq!(safe_redirect_target(None, HTTP, "/"), "/");
        assert_eq!(safe_redirect_target(Some("https://evil.com/"), HTTP, "/"), "/");
        assert_eq!(safe_redirect_target(Some("/mypage/"), HTTP, "/"), "/mypage/");
    }
}
