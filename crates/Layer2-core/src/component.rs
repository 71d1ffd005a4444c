//! Component - 등록 가능한 UI 단위의 계약
//!
//! 컴포넌트는 선택적 식별자, 라우트 선언, render/remove 생명주기, 옵션,
//! any-event 채널을 노출합니다. 렌더 플래그 같은 가변 북키핑은 컴포넌트가
//! 아니라 레지스트리 레코드에 둡니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use waypoint_foundation::{ComponentOptions, Error, EventEmitter, Result};

// ============================================================================
// ComponentId
// ============================================================================

/// 자동 할당 식별자 카운터
static COMPONENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 컴포넌트 식별자
///
/// 복합 토큰 `"<ownerId>-<handlerName>"` 의 앞부분으로 쓰이므로 `-` 를
/// 포함할 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    /// 호출자 제공 식별자 검증 후 생성
    pub fn new(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw.contains('-') {
            return Err(Error::InvalidComponentId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// 식별자가 없는 컴포넌트에 할당할 새 식별자 생성
    pub fn generate() -> Self {
        let n = COMPONENT_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("component{}", n))
    }

    /// 기본 라우트 바인딩이 가리키는 예약 식별자
    pub fn coordinator() -> Self {
        Self("coordinator".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// HashMap<ComponentId, _> 를 &str 로 조회하기 위한 구현
impl std::borrow::Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Component Trait
// ============================================================================

/// 컴포넌트 인터페이스
///
/// 호스트 애플리케이션에서 구현합니다. 라우트 선언은 (패턴, 핸들러 이름)
/// 쌍이고, 매칭된 핸들러는 `invoke` 로 호출됩니다 - 문자열 리플렉션이
/// 아니라 구현체가 직접 디스패치합니다.
#[async_trait]
pub trait Component: Send + Sync {
    /// 식별자 - None 이면 등록 시점에 할당
    fn id(&self) -> Option<&str> {
        None
    }

    /// 컴포넌트 이름 (진단 로그 접두어)
    fn name(&self) -> &str;

    /// 라우트 선언: (패턴, 핸들러 이름) 쌍
    fn routes(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// 생명주기 옵션 - None 이면 코디네이터 기본값 적용
    fn options(&self) -> Option<ComponentOptions> {
        None
    }

    /// any-event 채널 - 레지스트리가 구독해 코디네이터로 버블링
    fn emitter(&self) -> Option<&EventEmitter> {
        None
    }

    /// 렌더 - 기본 구현은 미구현 에러 (호출될 때에만 발생)
    async fn render(&self) -> Result<()> {
        Err(Error::unimplemented("render"))
    }

    /// 제거 - 라우트 이탈 스윕에서 호출
    async fn remove(&self) -> Result<()> {
        Ok(())
    }

    /// 라우트 핸들러 호출 - 위치 인자 리스트와 함께
    async fn invoke(&self, handler: &str, args: &[Value]) -> Result<()>;
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_unique_and_dashless() {
        let a = ComponentId::generate();
        let b = ComponentId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().contains('-'));
        assert!(a.as_str().starts_with("component"));
    }

    #[test]
    fn test_id_validation() {
        assert!(ComponentId::new("nav").is_ok());
        assert!(matches!(
            ComponentId::new("my-nav"),
            Err(Error::InvalidComponentId(_))
        ));
        assert!(ComponentId::new("").is_err());
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::HashMap;

        let id = ComponentId::new("nav").unwrap();
        let mut map = HashMap::new();
        map.insert(id, 1);
        assert_eq!(map.get("nav"), Some(&1));
    }

    struct Bare;

    #[async_trait]
    impl Component for Bare {
        fn name(&self) -> &str {
            "bare"
        }

        async fn invoke(&self, _handler: &str, _args: &[Value]) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_render_is_unimplemented() {
        let bare = Bare;
        assert!(matches!(
            bare.render().await,
            Err(Error::Unimplemented(op)) if op == "render"
        ));
        assert!(bare.remove().await.is_ok());
        assert!(bare.routes().is_empty());
        assert!(bare.options().is_none());
    }
}
