//! Dispatcher - 현재 라우트 토큰 상태 머신
//!
//! 단일 변수 "현재 라우트 토큰" 위의 상태 머신입니다. 가장 중요한
//! 계약: 같은 토큰의 재진입은 완전한 no-op 입니다 (재렌더 없음, 핸들러
//! 호출 없음, 스윕 없음).

use parking_lot::Mutex;

/// 현재 라우트 마커
pub struct Dispatcher {
    current: Mutex<Option<String>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// 토큰 수락 시도
    ///
    /// 저장된 현재 토큰과 같으면 `None` (이벤트 전체 무시). 다르면 토큰을
    /// 현재로 저장하고 이전 토큰을 반환합니다.
    pub fn accept(&self, token: &str) -> Option<Option<String>> {
        let mut current = self.current.lock();

        if current.as_deref() == Some(token) {
            return None;
        }

        Some(current.replace(token.to_string()))
    }

    /// 마지막으로 디스패치된 토큰
    pub fn current(&self) -> Option<String> {
        self.current.lock().clone()
    }
}

impl Default for Dispatcher {
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
    fn test_first_token_accepted() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.accept("c1-home"), Some(None));
        assert_eq!(dispatcher.current().as_deref(), Some("c1-home"));
    }

    #[test]
    fn test_repeat_token_ignored() {
        let dispatcher = Dispatcher::new();
        dispatcher.accept("c1-home");

        // 재진입은 no-op
        assert_eq!(dispatcher.accept("c1-home"), None);
        assert_eq!(dispatcher.current().as_deref(), Some("c1-home"));
    }

    #[test]
    fn test_distinct_token_replaces() {
        let dispatcher = Dispatcher::new();
        dispatcher.accept("c1-home");

        let previous = dispatcher.accept("c2-open").unwrap();
        assert_eq!(previous.as_deref(), Some("c1-home"));
        assert_eq!(dispatcher.current().as_deref(), Some("c2-open"));

        // 사이에 다른 토큰이 끼면 같은 토큰도 다시 수락
        assert!(dispatcher.accept("c1-home").is_some());
    }
}
