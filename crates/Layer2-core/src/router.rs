//! Router Adapter - 외부 라우터 경계
//!
//! 코어는 경로 문자열을 직접 파싱하지 않습니다. 어댑터가 패턴을 등록받고
//! 내비게이션이 매칭되면 복합 토큰과 캡처된 인자를 싱크(코디네이터)로
//! 전달합니다. `InMemoryRouter` 는 브라우저 히스토리 없이 쓰는 참조
//! 구현입니다.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Weak;
use tracing::debug;
use waypoint_foundation::Result;

// ============================================================================
// 경계 Trait
// ============================================================================

/// 매칭된 라우트를 받는 쪽 (코디네이터가 구현)
#[async_trait]
pub trait RouteSink: Send + Sync {
    /// 매칭된 라우트 통지: 복합 토큰과 위치 인자 리스트
    async fn route_matched(&self, token: &str, args: &[Value]) -> Result<()>;
}

/// 외부 라우터 어댑터 인터페이스
#[async_trait]
pub trait RouterAdapter: Send + Sync {
    /// 패턴을 복합 토큰에 바인딩
    async fn add_pattern(&self, pattern: &str, token: &str) -> Result<()>;

    /// 현재 위치를 새로 추가된 패턴에 대해 재평가
    ///
    /// 초기 로드 이후에 등록된 라우트가 현재 URL 과 매칭되면 즉시
    /// 발화하도록 합니다.
    async fn reevaluate(&self) -> Result<()>;

    /// 매칭 이벤트를 받을 싱크 연결
    fn set_sink(&self, sink: Weak<dyn RouteSink>);
}

// ============================================================================
// InMemoryRouter
// ============================================================================

/// 인메모리 참조 어댑터
///
/// 패턴은 `/` 세그먼트 단위로 비교하고 `:name` 세그먼트는 위치 인자로
/// 캡처합니다. 그 이상의 URL 파싱은 호스트 어댑터 몫입니다.
pub struct InMemoryRouter {
    /// (패턴, 토큰) - 등록 순서 유지, 첫 매칭이 이김
    patterns: RwLock<Vec<(String, String)>>,
    current: RwLock<Option<String>>,
    sink: RwLock<Option<Weak<dyn RouteSink>>>,
}

impl InMemoryRouter {
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            sink: RwLock::new(None),
        }
    }

    /// 위치 이동 - 현재 위치를 갱신하고 매칭을 발화
    pub async fn navigate(&self, location: &str) -> Result<()> {
        *self.current.write() = Some(location.to_string());
        self.fire(location).await
    }

    /// 현재 위치
    pub fn current_location(&self) -> Option<String> {
        self.current.read().clone()
    }

    async fn fire(&self, location: &str) -> Result<()> {
        let matched = self.match_location(location);
        let sink = self.sink.read().clone();

        let Some((token, args)) = matched else {
            debug!(location, "No pattern matched");
            return Ok(());
        };

        let Some(sink) = sink.and_then(|weak| weak.upgrade()) else {
            debug!(location, "No route sink attached");
            return Ok(());
        };

        sink.route_matched(&token, &args).await
    }

    fn match_location(&self, location: &str) -> Option<(String, Vec<Value>)> {
        let patterns = self.patterns.read();
        for (pattern, token) in patterns.iter() {
            if let Some(args) = match_pattern(pattern, location) {
                return Some((token.clone(), args));
            }
        }
        None
    }
}

impl Default for InMemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterAdapter for InMemoryRouter {
    async fn add_pattern(&self, pattern: &str, token: &str) -> Result<()> {
        let mut patterns = self.patterns.write();

        // 같은 패턴 재바인딩은 교체 (기본 라우트 덮어쓰기)
        if let Some(entry) = patterns.iter_mut().find(|(p, _)| p == pattern) {
            entry.1 = token.to_string();
        } else {
            patterns.push((pattern.to_string(), token.to_string()));
        }

        debug!(pattern, token, "Pattern bound to router");
        Ok(())
    }

    async fn reevaluate(&self) -> Result<()> {
        let location = self.current.read().clone();
        match location {
            Some(location) => self.fire(&location).await,
            None => Ok(()),
        }
    }

    fn set_sink(&self, sink: Weak<dyn RouteSink>) {
        *self.sink.write() = Some(sink);
    }
}

/// 세그먼트 단위 패턴 매칭, `:name` 은 캡처
fn match_pattern(pattern: &str, location: &str) -> Option<Vec<Value>> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let location_segments: Vec<&str> = location.split('/').collect();

    if pattern_segments.len() != location_segments.len() {
        return None;
    }

    let mut args = Vec::new();
    for (p, l) in pattern_segments.iter().zip(location_segments.iter()) {
        if let Some(_name) = p.strip_prefix(':') {
            args.push(Value::String(l.to_string()));
        } else if p != l {
            return None;
        }
    }

    Some(args)
}

// ============================================================================
// 테스트
// ============================================================================
