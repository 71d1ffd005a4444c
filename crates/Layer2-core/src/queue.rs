//! Deferred Task Queue - 준비 게이트 전까지 작업을 보관하는 FIFO 큐
//!
//! 등록과 라우트 바인딩은 즉시 실행되지 않고 이 큐에 쌓였다가, 준비
//! 게이트가 열리면 FIFO 순서로 소진됩니다. 실행 중인 작업이 새 작업을
//! 추가할 수 있으므로 소진 루프(`Coordinator::flush`)는 스냅샷이 아니라
//! 큐가 빌 때까지 반복합니다. 작업은 실행 전에 큐에서 제거되어 실행이
//! 실패해도 최대 한 번만 실행됩니다.

use crate::component::{Component, ComponentId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// QueuedTask
// ============================================================================

/// 지연 실행 작업
///
/// 코디네이터가 큐를 통해 실행하는 작업의 고정된 집합입니다.
pub enum QueuedTask {
    /// 컴포넌트 등록 실행
    Register(Arc<dyn Component>),

    /// 컴포넌트 렌더 실행
    Render(ComponentId),

    /// 라우터 어댑터에 패턴 바인딩 + 현재 위치 재평가
    BindRoute { pattern: String, token: String },
}

impl QueuedTask {
    /// 작업 종류 (로그용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Render(_) => "render",
            Self::BindRoute { .. } => "bind_route",
        }
    }
}

impl std::fmt::Debug for QueuedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(c) => f.debug_tuple("Register").field(&c.name()).finish(),
            Self::Render(id) => f.debug_tuple("Render").field(id).finish(),
            Self::BindRoute { pattern, token } => f
                .debug_struct("BindRoute")
                .field("pattern", pattern)
                .field("token", token)
                .finish(),
        }
    }
}

// ============================================================================
// DeferredQueue
// ============================================================================

/// 지연 작업 큐
pub struct DeferredQueue {
    tasks: Mutex<VecDeque<QueuedTask>>,
    open: AtomicBool,
}

impl DeferredQueue {
    /// 닫힌 게이트로 큐 생성
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
            open: AtomicBool::new(false),
        }
    }

    /// 작업 추가
    pub fn push(&self, task: QueuedTask) {
        tracing::trace!(kind = task.kind(), "Queueing deferred task");
        self.tasks.lock().push_back(task);
    }

    /// 맨 앞 작업을 꺼내면서 제거
    pub fn pop(&self) -> Option<QueuedTask> {
        self.tasks.lock().pop_front()
    }

    /// 준비 게이트 오픈 (one-shot)
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    /// 게이트가 열려 있는지 확인
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl Default for DeferredQueue {
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

    #[test]
    fn test_fifo_order() {
        let queue = DeferredQueue::new();
        queue.push(QueuedTask::Render(ComponentId::generate()));
        queue.push(QueuedTask::BindRoute {
            pattern: "home".to_string(),
            token: "c1-show".to_string(),
        });

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().unwrap().kind(), "render");
        assert_eq!(queue.pop().unwrap().kind(), "bind_route");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_pop_removes_before_execution() {
        let queue = DeferredQueue::new();
        queue.push(QueuedTask::Render(ComponentId::generate()));

        // 실행 전에 제거 - 실행이 실패해도 재실행되지 않음
        let task = queue.pop();
        assert!(task.is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_gate_starts_closed() {
        let queue = DeferredQueue::new();
        assert!(!queue.is_open());
        queue.open();
        assert!(queue.is_open());
    }

    #[test]
    fn test_push_during_drain_visible() {
        let queue = DeferredQueue::new();
        queue.push(QueuedTask::Render(ComponentId::generate()));

        // 소진 루프 중간에 추가된 작업도 같은 루프에서 보임
        let _ = queue.pop();
        queue.push(QueuedTask::Render(ComponentId::generate()));
        assert!(queue.pop().is_some());
        assert!(queue.pop().is_none());
    }
}
