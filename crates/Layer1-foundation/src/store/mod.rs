//! Store - 공유 관찰형 key-value 저장소
//!
//! 모든 컴포넌트가 보는 단일 상태 백입니다. 호스트 페이지가 부트스트랩
//! 스냅샷으로 초기화하고, 변경은 스토어 emitter 를 통해 이벤트로
//! 재방송됩니다. 구현은 `StoreFactory` 로 교체 가능합니다.

use crate::event::{types::store as store_events, EventEmitter};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

/// 부트스트랩 스냅샷 타입 (호스트가 공급하는 평범한 key-value 레코드)
pub type Bootstrap = Map<String, Value>;

// ============================================================================
// SharedStore Trait
// ============================================================================

/// 공유 스토어 인터페이스
///
/// 모든 변경은 `emitter()` 로 `store.changed` 이벤트를 발신해야 합니다.
/// 코디네이터는 이 emitter 를 구독해 변경을 버스로 재방송합니다.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// 키 조회
    async fn get(&self, key: &str) -> Option<Value>;

    /// 키 설정 - 변경 이벤트 발신
    async fn set(&self, key: &str, value: Value);

    /// 키 제거 - 제거된 값 반환, 있었다면 변경 이벤트 발신
    async fn remove(&self, key: &str) -> Option<Value>;

    /// 전체 스냅샷
    async fn snapshot(&self) -> Bootstrap;

    /// 변경 알림 채널
    fn emitter(&self) -> &EventEmitter;
}

/// 스토어 구현 팩토리
///
/// 호스트가 교체할 수 있는 플러그 포인트입니다. 코디네이터 설정에서
/// 팩토리를 제거하면 스토어 초기화가 `MissingStoreImplementation` 으로
/// 실패합니다.
pub trait StoreFactory: Send + Sync {
    /// 부트스트랩 스냅샷으로 스토어 생성
    fn create(&self, bootstrap: Bootstrap) -> std::sync::Arc<dyn SharedStore>;
}

// ============================================================================
// MemoryStore - 기본 구현
// ============================================================================

/// 인메모리 스토어 (기본 구현)
pub struct MemoryStore {
    values: RwLock<Bootstrap>,
    emitter: EventEmitter,
}

impl MemoryStore {
    /// 부트스트랩 스냅샷으로 생성
    pub fn new(bootstrap: Bootstrap) -> Self {
        debug!(keys = bootstrap.len(), "Initializing memory store");
        Self {
            values: RwLock::new(bootstrap),
            emitter: EventEmitter::new(),
        }
    }

    /// 빈 스토어 생성
    pub fn empty() -> Self {
        Self::new(Bootstrap::new())
    }
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Value> {
        self.values.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: Value) {
        let old = {
            let mut values = self.values.write().await;
            values.insert(key.to_string(), value.clone())
        };

        self.emitter
            .emit(store_events::changed(key, &value, old.as_ref()))
            .await;
    }

    async fn remove(&self, key: &str) -> Option<Value> {
        let old = self.values.write().await.remove(key);

        if let Some(ref old_value) = old {
            self.emitter
                .emit(store_events::changed(key, &Value::Null, Some(old_value)))
                .await;
        }

        old
    }

    async fn snapshot(&self) -> Bootstrap {
        self.values.read().await.clone()
    }

    fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }
}

/// 기본 인메모리 스토어 팩토리
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn create(&self, bootstrap: Bootstrap) -> std::sync::Arc<dyn SharedStore> {
        std::sync::Arc::new(MemoryStore::new(bootstrap))
    }
}

// ============================================================================
// 테스트
// ============================================================================
