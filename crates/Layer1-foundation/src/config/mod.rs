//! Config - 코디네이터 설정
//!
//! 호스트 페이지가 코디네이터를 만들 때 넘기는 설정입니다. JSON 파일
//! (`JsonStore`) 로 로드할 수 있고, 스토어 팩토리처럼 직렬화할 수 없는
//! 필드는 코드에서 주입합니다.

use crate::diag::LogGate;
use crate::event::EventBusConfig;
use crate::storage::JsonStore;
use crate::store::{Bootstrap, MemoryStoreFactory, StoreFactory};
use crate::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// ComponentOptions
// ============================================================================

/// 컴포넌트 생명주기 옵션
///
/// 컴포넌트가 옵션을 직접 제공하지 않으면 코디네이터 기본값이 적용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentOptions {
    /// 등록 직후 (준비 게이트 오픈 후) 렌더 예약
    pub render_on_register: bool,

    /// 소유 라우트 진입 시 아직 렌더되지 않았다면 렌더 예약
    pub render_on_route: bool,

    /// 다른 컴포넌트의 라우트로 전환될 때 remove 호출
    pub remove_off_route: bool,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            render_on_register: false,
            render_on_route: false,
            remove_off_route: false,
        }
    }
}

impl ComponentOptions {
    /// 인페이지 컴포넌트 기본값 (코디네이터 기본 옵션)
    pub fn in_page() -> Self {
        Self {
            render_on_register: true,
            render_on_route: false,
            remove_off_route: false,
        }
    }

    /// 팝업 스타일 컴포넌트 기본값
    pub fn popup() -> Self {
        Self {
            render_on_register: false,
            render_on_route: true,
            remove_off_route: true,
        }
    }
}

// ============================================================================
// CoordinatorConfig
// ============================================================================

fn default_store_factory() -> Option<Arc<dyn StoreFactory>> {
    Some(Arc::new(MemoryStoreFactory))
}

/// 코디네이터 설정
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// 디버그 플래그 (쿼리 스트링 전체 또는 소스 목록, 예: "?log=nav" / "nav,home")
    pub debug_filter: Option<String>,

    /// 옵션을 제공하지 않은 컴포넌트에 적용할 기본 옵션
    pub default_options: ComponentOptions,

    /// 스토어 부트스트랩 스냅샷
    pub bootstrap: Bootstrap,

    /// 이벤트 버스 설정
    pub event_bus: EventBusConfig,

    /// 스토어 팩토리 - None 이면 스토어 초기화가 실패
    #[serde(skip, default = "default_store_factory")]
    pub store_factory: Option<Arc<dyn StoreFactory>>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debug_filter: None,
            default_options: ComponentOptions::in_page(),
            bootstrap: Bootstrap::new(),
            event_bus: EventBusConfig::default(),
            store_factory: default_store_factory(),
        }
    }
}

impl std::fmt::Debug for CoordinatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorConfig")
            .field("debug_filter", &self.debug_filter)
            .field("default_options", &self.default_options)
            .field("bootstrap_keys", &self.bootstrap.len())
            .field("event_bus", &self.event_bus)
            .field("has_store_factory", &self.store_factory.is_some())
            .finish()
    }
}

impl CoordinatorConfig {
    /// 디버그 플래그 설정
    pub fn with_debug_filter(mut self, filter: impl Into<String>) -> Self {
        self.debug_filter = Some(filter.into());
        self
    }

    /// 기본 컴포넌트 옵션 설정
    pub fn with_default_options(mut self, options: ComponentOptions) -> Self {
        self.default_options = options;
        self
    }

    /// 부트스트랩 스냅샷 설정
    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// 스토어 팩토리 교체
    pub fn with_store_factory(mut self, factory: Arc<dyn StoreFactory>) -> Self {
        self.store_factory = Some(factory);
        self
    }

    /// 스토어 팩토리 제거 - 스토어 초기화가 MissingStoreImplementation 으로 실패
    pub fn without_store(mut self) -> Self {
        self.store_factory = None;
        self
    }

    /// 디버그 플래그에서 로그 게이트 생성
    pub fn log_gate(&self) -> LogGate {
        match self.debug_filter.as_deref() {
            Some(filter) if filter.contains("log=") => LogGate::from_query(filter),
            Some(filter) => LogGate::from_spec(filter),
            None => LogGate::disabled(),
        }
    }
}

// ============================================================================
// Configurable Trait
// ============================================================================

/// 설정 가능 인터페이스
///
/// JSON 설정 파일과 연동됩니다.
pub trait Configurable: Serialize + DeserializeOwned + Default {
    /// 설정 파일 이름
    const FILE_NAME: &'static str;

    /// 글로벌 설정 로드
    fn load_global() -> Result<Self> {
        let store = JsonStore::global()?;
        Ok(store.load_or_default(Self::FILE_NAME))
    }

    /// 프로젝트 설정 로드
    fn load_project(root: impl Into<std::path::PathBuf>) -> Result<Self> {
        let store = JsonStore::project(root);
        Ok(store.load_or_default(Self::FILE_NAME))
    }

    /// 글로벌 설정 저장
    fn save_global(&self) -> Result<()> {
        let store = JsonStore::global()?;
        store.save(Self::FILE_NAME, self)
    }
}

impl Configurable for CoordinatorConfig {
    const FILE_NAME: &'static str = "coordinator.json";
}

// ============================================================================
// 테스트
// ============================================================================
