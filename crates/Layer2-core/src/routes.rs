//! Route Table - 라우트 패턴과 소유자/핸들러 매핑
//!
//! 패턴당 바인딩은 최대 하나입니다. 빈 문자열 패턴은 예약된 기본
//! 라우트로 유일성 검사에서 제외됩니다 (폴백 센티널이지 실제 바인딩이
//! 아니므로 조용히 덮어씁니다).

use crate::component::ComponentId;
use parking_lot::RwLock;
use std::collections::HashMap;
use waypoint_foundation::{Error, Result};

/// 예약된 기본 라우트 패턴
pub const DEFAULT_ROUTE: &str = "";

/// 기본 라우트에 붙는 no-op 핸들러 이름
pub const DEFAULT_HANDLER: &str = "default";

// ============================================================================
// RouteToken 헬퍼
// ============================================================================

/// 복합 토큰 `"<ownerId>-<handlerName>"` 생성
pub fn compose_token(owner: &ComponentId, handler: &str) -> String {
    format!("{}-{}", owner, handler)
}

/// 복합 토큰을 (ownerId, handlerName) 으로 분리
///
/// 핸들러 이름에는 `-` 가 올 수 있으므로 첫 `-` 에서만 자릅니다.
pub fn split_token(token: &str) -> Option<(&str, &str)> {
    token.split_once('-')
}

// ============================================================================
// RouteTable
// ============================================================================

/// 라우트 바인딩: 소유 컴포넌트와 핸들러 이름
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    pub owner: ComponentId,
    pub handler: String,
}

/// 라우트 테이블
///
/// 생성 시점에 기본 라우트가 no-op 바인딩으로 미리 등록되어 알 수 없는
/// 위치로의 내비게이션도 예측 가능하게 라우팅됩니다.
pub struct RouteTable {
    bindings: RwLock<HashMap<String, RouteBinding>>,
}

impl RouteTable {
    /// 기본 라우트가 바인딩된 테이블 생성
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(
            DEFAULT_ROUTE.to_string(),
            RouteBinding {
                owner: ComponentId::coordinator(),
                handler: DEFAULT_HANDLER.to_string(),
            },
        );

        Self {
            bindings: RwLock::new(bindings),
        }
    }

    /// 패턴 바인딩
    ///
    /// 비어 있지 않은 패턴이 이미 등록되어 있으면 `DuplicateRoute` 에러.
    /// 기본 패턴은 유일성 검사 없이 덮어씁니다.
    pub fn add(&self, pattern: &str, owner: ComponentId, handler: &str) -> Result<()> {
        let mut bindings = self.bindings.write();

        if pattern != DEFAULT_ROUTE && bindings.contains_key(pattern) {
            return Err(Error::DuplicateRoute(pattern.to_string()));
        }

        bindings.insert(
            pattern.to_string(),
            RouteBinding {
                owner,
                handler: handler.to_string(),
            },
        );

        Ok(())
    }

    /// 패턴으로 바인딩 조회
    pub fn lookup(&self, pattern: &str) -> Option<RouteBinding> {
        self.bindings.read().get(pattern).cloned()
    }

    /// 패턴이 바인딩되어 있는지 확인
    pub fn contains(&self, pattern: &str) -> bool {
        self.bindings.read().contains_key(pattern)
    }

    /// 등록된 패턴 수 (기본 라우트 포함)
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// 등록된 패턴 목록
    pub fn patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = self.bindings.read().keys().cloned().collect();
        patterns.sort();
        patterns
    }
}

impl Default for RouteTable {
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

    fn id(raw: &str) -> ComponentId {
        ComponentId::new(raw).unwrap()
    }

    #[test]
    fn test_default_route_prebound() {
        let table = RouteTable::new();
        let binding = table.lookup(DEFAULT_ROUTE).unwrap();
        assert_eq!(binding.owner, ComponentId::coordinator());
        assert_eq!(binding.handler, DEFAULT_HANDLER);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let table = RouteTable::new();
        table.add("home", id("c1"), "show").unwrap();

        let err = table.add("home", id("c2"), "open").unwrap_err();
        assert!(matches!(err, Error::DuplicateRoute(route) if route == "home"));

        // 첫 바인딩은 그대로
        assert_eq!(table.lookup("home").unwrap().owner, id("c1"));
    }

    #[test]
    fn test_default_route_exempt_from_uniqueness() {
        let table = RouteTable::new();
        table.add(DEFAULT_ROUTE, id("c1"), "default").unwrap();
        table.add(DEFAULT_ROUTE, id("c2"), "default").unwrap();

        // 마지막 등록이 이김
        assert_eq!(table.lookup(DEFAULT_ROUTE).unwrap().owner, id("c2"));
    }

    #[test]
    fn test_lookup_absent() {
        let table = RouteTable::new();
        assert!(table.lookup("missing").is_none());
        assert!(!table.contains("missing"));
    }

    #[test]
    fn test_token_compose_split() {
        let token = compose_token(&id("c1"), "show");
        assert_eq!(token, "c1-show");
        assert_eq!(split_token(&token), Some(("c1", "show")));

        // 핸들러 이름의 '-' 는 보존
        assert_eq!(split_token("c1-show-all"), Some(("c1", "show-all")));

        // '-' 없는 토큰은 분리 불가
        assert_eq!(split_token("default"), None);
    }
}
