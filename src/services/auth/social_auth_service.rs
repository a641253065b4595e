//! # 소셜 로그인 오케스트레이션
//!
//! 프로바이더 검증 → 계정 연동(트랜잭션 + 재시도) → 세션 발급 순서로 진행합니다.
//!
//! ```text
//! handler ──▶ SocialAuthService
//!               ├─ OAuthStateRepository   (리다이렉트 방식: state 발급/소비)
//!               ├─ {Google,Kakao,Naver,Apple}AuthService  → VerifiedIdentity
//!               ├─ identity_reconciler::authenticate       → User
//!               └─ TokenService                            → TokenPair
//! ```

use std::future::Future;
use std::sync::Arc;
use singleton_macro::service;
use crate::domain::entities::users::user::User;
use crate::domain::dto::users::response::OAuthLoginUrlResponse;
use crate::domain::models::oauth::social_provider::SocialProvider;
use crate::domain::models::oauth::verified_identity::VerifiedIdentity;
use crate::domain::models::token::token::TokenPair;
use crate::errors::{AppError, AppResult};
use crate::repositories::oauth::oauth_state_repository::OAuthStateRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::services::auth::apple_auth_service::AppleAuthService;
use crate::services::auth::google_auth_service::GoogleAuthService;
use crate::services::auth::identity_reconciler::{authenticate, ReconcileOutcome};
use crate::services::auth::kakao_auth_service::KakaoAuthService;
use crate::services::auth::naver_auth_service::NaverAuthService;
use crate::services::auth::token_service::TokenService;

/// 로그인 완료 결과
#[derive(Debug, Clone)]
pub struct SocialLogin {
    pub provider: SocialProvider,
    pub user: User,
    pub tokens: TokenPair,
    pub outcome: ReconcileOutcome,
    /// 리다이렉트 방식에서 로그인 시작 시 저장해 둔 `next`
    pub next: Option<String>,
}

impl SocialLogin {
    pub fn message(&self) -> String {
        match self.outcome {
            ReconcileOutcome::Created => format!("{} 계정으로 가입되었습니다.", self.provider.label()),
            ReconcileOutcome::Linked => format!("{} 계정이 기존 계정에 연결되었습니다.", self.provider.label()),
            ReconcileOutcome::Existing => format!("{} 로그인에 성공했습니다.", self.provider.label()),
        }
    }
}

/// 리다이렉트 방식 콜백 입력
#[derive(Debug)]
pub struct OAuthCallback {
    pub code: String,
    pub state: String,
    /// Apple 최초 로그인 시 전달되는 사용자 JSON
    pub apple_user: Option<String>,
}

#[service(name = "social_auth")]
pub struct SocialAuthService {
    user_repo: Arc<UserRepository>,
    state_repo: Arc<OAuthStateRepository>,
    token_service: Arc<TokenService>,
    google: Arc<GoogleAuthService>,
    kakao: Arc<KakaoAuthService>,
    naver: Arc<NaverAuthService>,
    apple: Arc<AppleAuthService>,
}

impl SocialAuthService {
    /// state를 발급하고 프로바이더 인가 URL을 만듭니다.
    pub async fn login_url(&self, provider: SocialProvider, next: Option<String>) -> AppResult<OAuthLoginUrlResponse> {
        let state = self.state_repo.issue(provider, next).await?;

        let login_url = match provider {
            SocialProvider::Google => self.google.login_url(&state)?,
            SocialProvider::Kakao => self.kakao.login_url(&state)?,
            SocialProvider::Naver => self.naver.login_url(&state)?,
            SocialProvider::Apple => self.apple.login_url(&state)?,
        };

        Ok(OAuthLoginUrlResponse { login_url, state })
    }

    pub async fn login_with_google_credential(&self, credential: &str) -> AppResult<SocialLogin> {
        self.complete(SocialProvider::Google, self.google.verify_id_token(credential), None).await
    }

    pub async fn login_with_kakao_token(&self, access_token: &str) -> AppResult<SocialLogin> {
        self.complete(SocialProvider::Kakao, self.kakao.verify_access_token(access_token), None).await
    }

    /// 콜백의 state를 소비한 뒤 인가 코드를 검증합니다.
    pub async fn login_with_callback(&self, provider: SocialProvider, callback: OAuthCallback) -> AppResult<SocialLogin> {
        let entry = self.state_repo.consume(provider, &callback.state).await?;
        let code = callback.code.as_str();

        match provider {
            SocialProvider::Google => {
                self.complete(provider, self.google.verify_code(code), entry.next).await
            }
            SocialProvider::Kakao => {
                self.complete(provider, self.kakao.verify_code(code), entry.next).await
            }
            SocialProvider::Naver => {
                self.complete(provider, self.naver.verify_code(code, &callback.state), entry.next).await
            }
            SocialProvider::Apple => {
                let verification = self.apple.verify_code(code, callback.apple_user.as_deref());
                self.complete(provider, verification, entry.next).await
            }
        }
    }

    async fn complete<F>(&self, provider: SocialProvider, verification: F, next: Option<String>) -> AppResult<SocialLogin>
    where
        F: Future<Output = AppResult<VerifiedIdentity>>,
    {
        let reconciled = authenticate(self.user_repo.as_ref(), verification).await?;
        let user = reconciled.user;

        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?;

        if reconciled.outcome == ReconcileOutcome::Linked {
            self.user_repo.evict(&user_id).await;
        }

        if !user.is_active {
            log::warn!("비활성 계정 로그인 시도 - user: {}", user_id);
            return Err(AppError::AuthenticationError("비활성화된 계정입니다".to_string()));
        }

        if let Err(e) = self.user_repo.touch_last_login(&user_id).await {
            log::warn!("마지막 로그인 시각 갱신 실패 - user: {}: {}", user_id, e);
        }

        let tokens = self.token_service.issue_session(&user, provider).await?;

        Ok(SocialLogin {
            provider,
            user,
            tokens,
            outcome: reconciled.outcome,
            next,
        })
    }
}
