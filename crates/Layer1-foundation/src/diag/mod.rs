//! Diag - 이름 기반 게이트 진단 로깅
//!
//! 호스트가 넘겨주는 디버그 플래그 (예: 쿼리 스트링의 `log=nav,home`)로
//! 어떤 소스가 로그를 남길 수 있는지 결정합니다. 예약 와일드카드 `debug`는
//! 모든 소스를 허용합니다. 출력 포맷 자체는 `tracing` 구독자에 위임합니다.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// 와일드카드 소스 이름 - 모든 소스의 로그를 허용
pub const WILDCARD: &str = "debug";

// ============================================================================
// LogGate
// ============================================================================

/// 로그 게이트
///
/// 외부 디버그 플래그에서 파싱된, 로그가 허용된 소스 이름 목록입니다.
/// 기본값은 전부 차단입니다.
#[derive(Debug, Clone, Default)]
pub struct LogGate {
    enabled: bool,
    sources: Vec<String>,
}

impl LogGate {
    /// 전부 차단하는 게이트 생성
    pub fn disabled() -> Self {
        Self::default()
    }

    /// 소스 목록 스펙에서 게이트 생성 (예: "nav,home" 또는 "debug")
    pub fn from_spec(spec: &str) -> Self {
        let sources: Vec<String> = spec
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            enabled: !sources.is_empty(),
            sources,
        }
    }

    /// 쿼리 스트링에서 게이트 생성 (예: "?log=nav,home&theme=dark")
    ///
    /// `log=` 파라미터가 없으면 전부 차단합니다.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        for part in query.split('&') {
            if let Some(spec) = part.strip_prefix("log=") {
                return Self::from_spec(spec);
            }
        }

        Self::disabled()
    }

    /// 해당 소스의 로그가 허용되는지 확인
    pub fn allows(&self, source: &str) -> bool {
        if !self.enabled {
            return false;
        }

        if self.sources.iter().any(|s| s == WILDCARD) {
            return true;
        }

        self.sources.iter().any(|s| s == source)
    }

    /// 게이트가 열려 있는지 (하나 이상의 소스 허용)
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ============================================================================
// DiagLogger
// ============================================================================

/// 이름 접두 진단 로거
///
/// 컴포넌트와 코디네이터가 각자 자기 이름으로 만들어 사용합니다.
/// 게이트는 공유되므로 호스트 플래그 하나로 전체를 제어합니다.
#[derive(Debug, Clone)]
pub struct DiagLogger {
    name: String,
    gate: Arc<LogGate>,
}

impl DiagLogger {
    /// 새 로거 생성
    pub fn new(name: impl Into<String>, gate: Arc<LogGate>) -> Self {
        Self {
            name: name.into(),
            gate,
        }
    }

    /// 같은 게이트를 공유하는 다른 이름의 로거 생성
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gate: self.gate.clone(),
        }
    }

    /// 로거 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 이 로거가 현재 출력 가능한지 확인
    pub fn is_active(&self) -> bool {
        self.gate.allows(&self.name)
    }

    /// 이름 접두 진단 라인 출력
    pub fn log(&self, message: &str) {
        if self.is_active() {
            debug!(target: "waypoint", "{}: {}", self.name, message);
        }
    }

    /// 구조화된 데이터를 포함한 진단 라인 출력
    pub fn log_kv(&self, message: &str, data: &Value) {
        if self.is_active() {
            debug!(target: "waypoint", data = %data, "{}: {}", self.name, message);
        }
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let gate = LogGate::disabled();
        assert!(!gate.is_enabled());
        assert!(!gate.allows("nav"));
        assert!(!gate.allows(WILDCARD));
    }

    #[test]
    fn test_from_spec() {
        let gate = LogGate::from_spec("nav, home");
        assert!(gate.allows("nav"));
        assert!(gate.allows("home"));
        assert!(!gate.allows("popup"));
    }

    #[test]
    fn test_wildcard_allows_all() {
        let gate = LogGate::from_spec("debug");
        assert!(gate.allows("nav"));
        assert!(gate.allows("anything"));
    }

    #[test]
    fn test_from_query() {
        let gate = LogGate::from_query("?theme=dark&log=nav,home");
        assert!(gate.allows("nav"));
        assert!(!gate.allows("popup"));

        let gate = LogGate::from_query("?theme=dark");
        assert!(!gate.is_enabled());
    }

    #[test]
    fn test_logger_gating() {
        let gate = Arc::new(LogGate::from_spec("nav"));
        let nav = DiagLogger::new("nav", gate.clone());
        let popup = nav.named("popup");

        assert!(nav.is_active());
        assert!(!popup.is_active());

        // 출력 자체는 tracing 구독자 몫 - 여기서는 게이트만 검증
        nav.log("route bound");
        popup.log("should stay silent");
    }
}
