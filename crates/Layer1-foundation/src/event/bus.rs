//! Event Bus - 코디네이터 레벨 이벤트 브로드캐스트
//!
//! 컴포넌트에서 버블링된 이벤트와 코디네이터가 발행하는 이벤트를
//! 리스너들에게 전달합니다. 전역 싱글턴이 아니라 코디네이터가 소유하고
//! 필요한 곳에 주입합니다.

use super::types::{EventCategory, WaypointEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

// ============================================================================
// EventListener Trait
// ============================================================================

/// 이벤트 리스너 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// 이벤트 리스너 trait
///
/// 이벤트를 수신하고 처리하는 쪽이 구현합니다. 컴포넌트 emitter 와
/// 코디네이터 버스가 같은 리스너 타입을 공유합니다.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 관심 있는 이벤트 카테고리 (None이면 모든 이벤트)
    fn categories(&self) -> Option<Vec<EventCategory>> {
        None
    }

    /// 이벤트 처리
    async fn on_event(&self, event: &WaypointEvent);
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EventBusConfig {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,

    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_size: 100,
        }
    }
}

/// 이벤트 버스
///
/// 코디네이터에 도달한 모든 이벤트를 리스너에게 전달합니다.
/// 전달 순서는 구독 순서이며, 전달은 publish 호출 안에서 인라인으로
/// 일어납니다 (단일 이벤트 루프 모델).
pub struct EventBus {
    /// 설정
    config: EventBusConfig,

    /// 브로드캐스트 채널 송신자 (스트림 방식 구독용)
    sender: broadcast::Sender<WaypointEvent>,

    /// 등록된 리스너
    listeners: RwLock<HashMap<ListenerId, Arc<dyn EventListener>>>,

    /// 리스너 ID 카운터
    listener_counter: AtomicU64,

    /// 이벤트 히스토리
    history: RwLock<Vec<WaypointEvent>>,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);

        Self {
            config,
            sender,
            listeners: RwLock::new(HashMap::new()),
            listener_counter: AtomicU64::new(0),
            history: RwLock::new(Vec::new()),
        }
    }

    /// 리스너 등록
    pub async fn subscribe(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        let id = ListenerId::new(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            listener_name = listener.name(),
            listener_id = %id,
            "Registering event listener"
        );

        let mut listeners = self.listeners.write().await;
        listeners.insert(id, listener);

        id
    }

    /// 리스너 해제
    pub async fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().await;
        let removed = listeners.remove(&id).is_some();

        if removed {
            debug!(listener_id = %id, "Unregistered event listener");
        }

        removed
    }

    /// 이벤트 발행
    pub async fn publish(&self, event: WaypointEvent) {
        trace!(
            event_id = %event.id,
            event_type = %event.event_type,
            category = ?event.category,
            "Publishing event"
        );

        // 히스토리에 추가
        {
            let mut history = self.history.write().await;
            history.push(event.clone());

            if history.len() > self.config.history_size {
                history.remove(0);
            }
        }

        // 브로드캐스트 채널로 전송 (수신자가 없으면 무시)
        let _ = self.sender.send(event.clone());

        // 등록된 리스너들에게 전달 - 카테고리 관심 선언이 있으면 거기에 따름
        let listeners = self.listeners.read().await;
        for (id, listener) in listeners.iter() {
            let interested = match listener.categories() {
                Some(cats) => cats.contains(&event.category),
                None => true,
            };

            if interested {
                trace!(
                    listener_id = %id,
                    listener_name = listener.name(),
                    event_type = %event.event_type,
                    "Delivering event to listener"
                );

                listener.on_event(&event).await;
            }
        }
    }

    /// 브로드캐스트 수신자 생성 (스트림 방식)
    pub fn receiver(&self) -> broadcast::Receiver<WaypointEvent> {
        self.sender.subscribe()
    }

    /// 최근 이벤트 히스토리 조회
    pub async fn history(&self, limit: Option<usize>) -> Vec<WaypointEvent> {
        let history = self.history.read().await;
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    /// 등록된 리스너 수
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct TestListener {
        name: String,
        count: AtomicUsize,
    }

    impl TestListener {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                count: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventListener for TestListener {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_event(&self, _event: &WaypointEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_event_bus_basic() {
        let bus = EventBus::new();

        let listener = Arc::new(TestListener::new("test"));
        let id = bus.subscribe(listener.clone()).await;

        assert_eq!(bus.listener_count().await, 1);

        let event = WaypointEvent::new("test.event", EventCategory::Custom);
        bus.publish(event).await;

        assert_eq!(listener.call_count(), 1);

        bus.unsubscribe(id).await;
        assert_eq!(bus.listener_count().await, 0);
    }

    struct RouteOnlyListener {
        count: AtomicUsize,
    }

    #[async_trait]
    impl EventListener for RouteOnlyListener {
        fn name(&self) -> &str {
            "route-only"
        }

        fn categories(&self) -> Option<Vec<EventCategory>> {
            Some(vec![EventCategory::Route])
        }

        async fn on_event(&self, _event: &WaypointEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_category_interest_delivery() {
        let bus = EventBus::new();
        let listener = Arc::new(RouteOnlyListener {
            count: AtomicUsize::new(0),
        });
        bus.subscribe(listener.clone()).await;

        bus.publish(WaypointEvent::new("route.changed", EventCategory::Route))
            .await;
        bus.publish(WaypointEvent::new("store.changed", EventCategory::Store))
            .await;

        // 관심 카테고리의 이벤트만 전달
        assert_eq!(listener.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_history_cap() {
        let config = EventBusConfig {
            history_size: 5,
            ..Default::default()
        };
        let bus = EventBus::with_config(config);

        for i in 0..10 {
            let event =
                WaypointEvent::new(format!("test.event.{}", i), EventCategory::Custom);
            bus.publish(event).await;
        }

        // 히스토리는 최근 5개만 유지
        let history = bus.history(None).await;
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].event_type, "test.event.9");
    }
}
