//! # 서비스 레지스트리
//!
//! `singleton_macro`의 `#[service]`, `#[repository]` 매크로가 생성한 등록 정보를
//! `inventory`로 수집하고, `Arc<T>` 필드 주입 요청을 타입 이름으로 해석합니다.
//!
//! ## 이름 규칙
//!
//! 매크로는 `{name}_service` / `{name}_repository` 형태로 등록합니다.
//! 이름을 지정하지 않으면 구조체 이름 전체를 소문자로 바꾼 값이 쓰이므로
//! (`TokenService` → `tokenservice_service`), 양쪽 이름을 모두 같은 키로 정규화합니다.
//!
//! ```text
//! "social_auth_service"    → "socialauth"
//! "socialauthservice_service" → "socialauth"
//! SocialAuthService (타입)  → "socialauth"
//! ```
//!
//! ## 생성 순서
//!
//! 인스턴스 생성은 잠금 밖에서 수행합니다. 생성자가 다시 `ServiceLocator::get`을
//! 호출해 하위 의존성을 해결하기 때문입니다. 같은 스레드에서 생성 중인 타입을 다시
//! 요청하면 순환 참조로 판단합니다.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;

/// `#[service]` 매크로가 구현하는 트레이트
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 트레이트
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (normalize_component_name(registration.name), registration))
        .collect();

    log::debug!("서비스 이름 캐시 초기화: {}개", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (normalize_component_name(registration.name), registration))
        .collect();

    log::debug!("리포지토리 이름 캐시 초기화: {}개", cache.len());
    cache
});

thread_local! {
    static INITIALIZING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// 등록 이름과 타입 이름을 같은 조회 키로 정규화합니다.
pub fn normalize_component_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut key = lower.as_str();

    for suffix in ["_service", "_repository"] {
        if let Some(stripped) = key.strip_suffix(suffix) {
            key = stripped;
            break;
        }
    }

    for suffix in ["service", "repository"] {
        if let Some(stripped) = key.strip_suffix(suffix) {
            if !stripped.is_empty() {
                key = stripped;
            }
            break;
        }
    }

    key.replace('_', "")
}

/// 생성 중 표시를 해제하는 가드
struct InitializingGuard(TypeId);

impl InitializingGuard {
    fn enter(type_id: TypeId, type_name: &str) -> Self {
        let inserted = INITIALIZING.with(|set| set.borrow_mut().insert(type_id));
        if !inserted {
            log::error!("순환 의존성 감지: {}", type_name);
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }
        Self(type_id)
    }
}

impl Drop for InitializingGuard {
    fn drop(&mut self) {
        INITIALIZING.with(|set| {
            set.borrow_mut().remove(&self.0);
        });
    }
}

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 등록된 인스턴스를 반환하고, 없으면 매크로 등록 정보로 생성합니다.
    ///
    /// # Panics
    ///
    /// 등록되지 않은 타입이거나 순환 의존성이 있으면 패닉합니다.
    /// 매크로가 생성하는 생성자는 실패를 표현할 수 없으므로 기동 시점에 드러나야 합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::lookup::<T>() {
            return instance;
        }

        let created = {
            let _guard = InitializingGuard::enter(type_id, type_name);
            Self::construct::<T>(type_name)
        };

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| created as Arc<dyn Any + Send + Sync>)
            .clone();

        match stored.downcast::<T>() {
            Ok(instance) => instance,
            Err(_) => panic!("Type mismatch in ServiceLocator for {}", type_name),
        }
    }

    /// 이미 등록된 인스턴스만 조회합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        Self::lookup::<T>()
    }

    fn lookup<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let clean_name = Self::extract_clean_type_name(type_name);
        let key = normalize_component_name(clean_name);

        // 서비스와 리포지토리가 같은 키("token")를 가질 수 있어 타입 이름으로 구분합니다.
        let constructor = if clean_name.ends_with("Repository") {
            REPOSITORY_NAME_CACHE
                .get(&key)
                .map(|registration| (registration.name, registration.constructor))
        } else {
            SERVICE_NAME_CACHE
                .get(&key)
                .map(|registration| (registration.name, registration.constructor))
        };

        let Some((name, constructor)) = constructor else {
            panic!(
                "Service not found: {}. Register it with #[service] or #[repository], or call ServiceLocator::set()",
                type_name
            );
        };

        match constructor().downcast::<Arc<T>>() {
            Ok(instance) => *instance,
            Err(_) => panic!("Type mismatch for registration: {}", name),
        }
    }

    fn extract_clean_type_name(type_name: &str) -> &str {
        let without_generics = type_name.split('<').next().unwrap_or(type_name);
        match without_generics.rfind("::") {
            Some(pos) => &without_generics[pos + 2..],
            None => without_generics,
        }
    }

    /// 매크로로 생성할 수 없는 인프라 컴포넌트(DB, Redis)를 수동 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", Self::extract_clean_type_name(type_name));

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 모든 리포지토리와 서비스를 미리 생성합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        log::info!("🔄 서비스 레지스트리 초기화");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        for registration in &repositories {
            let _ = (registration.constructor)();
            log::info!("  ✓ {}", registration.name);
        }

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        for registration in &services {
            let _ = (registration.constructor)();
            log::info!("  ✓ {}", registration.name);
        }

        log::info!(
            "레지스트리 초기화 완료: 리포지토리 {}개, 서비스 {}개",
            repositories.len(),
            services.len()
        );

        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    struct ManualComponent {
        value: u32,
    }

    #[test]
    fn test_registered_name_and_type_name_share_key() {
        assert_eq!(normalize_component_name("social_auth_service"), "socialauth");
        assert_eq!(normalize_component_name("socialauthservice_service"), "socialauth");
        assert_eq!(normalize_component_name("SocialAuthService"), "socialauth");

        assert_eq!(normalize_component_name("user_repository"), "user");
        assert_eq!(normalize_component_name("UserRepository"), "user");
        assert_eq!(normalize_component_name("oauth_state_repository"), "oauthstate");
        assert_eq!(normalize_component_name("OAuthStateRepository"), "oauthstate");
    }

    #[test]
    fn test_bare_suffix_is_kept() {
        assert_eq!(normalize_component_name("Service"), "service");
    }

    #[test]
    fn test_clean_type_name() {
        assert_eq!(
            ServiceLocator::extract_clean_type_name("storefront_auth::services::auth::TokenService"),
            "TokenService"
        );
        assert_eq!(
            ServiceLocator::extract_clean_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec"
        );
    }

    #[test]
    fn test_manual_registration_is_returned() {
        ServiceLocator::set(Arc::new(ManualComponent { value: 7 }));

        let first = ServiceLocator::get::<ManualComponent>();
        let second = ServiceLocator::get::<ManualComponent>();

        assert_eq!(first.value, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_try_get_unregistered() {
        struct NeverRegistered;
        assert!(ServiceLocator::try_get::<NeverRegistered>().is_none());
    }
}
