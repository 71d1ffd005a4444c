//! Event Emitter - 컴포넌트의 "any-event" 채널
//!
//! 각 컴포넌트가 소유하는 경량 이벤트 발신기입니다. 레지스트리가 등록
//! 시점에 포워딩 리스너를 구독시켜 모든 이벤트를 코디네이터 버스로
//! 버블링합니다 (컴포넌트 → 코디네이터 단방향, 필터 없음).

use super::bus::{EventListener, ListenerId};
use super::types::WaypointEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// 컴포넌트 단위 이벤트 발신기
///
/// 버스와 달리 필터도 히스토리도 없습니다. 구독 순서대로 모든 리스너에게
/// 인라인으로 전달하기만 합니다.
pub struct EventEmitter {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn EventListener>)>>,
    counter: AtomicU64,
}

impl EventEmitter {
    /// 새 발신기 생성
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// 리스너 등록
    pub async fn subscribe(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        let id = ListenerId::from_raw(self.counter.fetch_add(1, Ordering::SeqCst));
        self.listeners.write().await.push((id, listener));
        id
    }

    /// 리스너 해제
    pub async fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// 이벤트 발신 - 구독 순서대로 전체 리스너에 전달
    pub async fn emit(&self, event: WaypointEvent) {
        trace!(event_type = %event.event_type, "Emitting component event");

        let listeners = self.listeners.read().await;
        for (_, listener) in listeners.iter() {
            listener.on_event(&event).await;
        }
    }

    /// 등록된 리스너 수
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================
