//! Registry - 살아 있는 컴포넌트의 북키핑
//!
//! 식별자 → 레코드 매핑과 렌더 플래그를 관리합니다. 컴포넌트 자체는
//! 불변으로 다루고, 코디네이터가 바꾸는 상태(렌더 여부, 적용된 옵션)는
//! 전부 레코드에 둡니다.

use crate::component::{Component, ComponentId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use waypoint_foundation::{ComponentOptions, EventBus, EventListener, WaypointEvent};

// ============================================================================
// RegisteredComponent
// ============================================================================

/// 레지스트리 레코드
pub struct RegisteredComponent {
    pub id: ComponentId,
    pub name: String,
    pub component: Arc<dyn Component>,
    pub options: ComponentOptions,
    pub rendered: bool,
}

/// 디스패치에 필요한 레코드 스냅샷
#[derive(Clone)]
pub struct ComponentEntry {
    pub id: ComponentId,
    pub component: Arc<dyn Component>,
    pub options: ComponentOptions,
    pub rendered: bool,
}

/// `Coordinator::list` 가 반환하는 진단 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub component: String,
    pub route: Option<String>,
    pub handler: Option<String>,
}

// ============================================================================
// ComponentRegistry
// ============================================================================

/// 컴포넌트 레지스트리
pub struct ComponentRegistry {
    components: RwLock<HashMap<ComponentId, RegisteredComponent>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
        }
    }

    /// 레코드 삽입 - 같은 식별자는 덮어씁니다
    pub fn insert(&self, record: RegisteredComponent) {
        let mut components = self.components.write();
        if components.contains_key(&record.id) {
            debug!(id = %record.id, "Replacing registered component");
        }
        components.insert(record.id.clone(), record);
    }

    /// 식별자로 스냅샷 조회
    pub fn entry(&self, id: &str) -> Option<ComponentEntry> {
        self.components.read().get(id).map(|record| ComponentEntry {
            id: record.id.clone(),
            component: record.component.clone(),
            options: record.options,
            rendered: record.rendered,
        })
    }

    /// 식별자로 컴포넌트 조회
    pub fn component(&self, id: &str) -> Option<Arc<dyn Component>> {
        self.components.read().get(id).map(|r| r.component.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }

    /// 렌더 플래그 설정
    pub fn mark_rendered(&self, id: &str) {
        if let Some(record) = self.components.write().get_mut(id) {
            record.rendered = true;
        }
    }

    /// 렌더 플래그 해제 (라우트 이탈 스윕)
    pub fn clear_rendered(&self, id: &str) {
        if let Some(record) = self.components.write().get_mut(id) {
            record.rendered = false;
        }
    }

    pub fn is_rendered(&self, id: &str) -> bool {
        self.components
            .read()
            .get(id)
            .map(|r| r.rendered)
            .unwrap_or(false)
    }

    /// 라우트 이탈 스윕 대상 조회
    ///
    /// 방금 매칭된 컴포넌트를 제외하고 `remove_off_route` 가 설정된
    /// 레코드를 반환합니다. 맵에서 한 번씩만 나오므로 디스패치당 최대
    /// 한 번 스윕됩니다.
    pub fn sweep_candidates(&self, except: &str) -> Vec<(ComponentId, Arc<dyn Component>)> {
        self.components
            .read()
            .values()
            .filter(|r| r.id.as_str() != except && r.options.remove_off_route)
            .map(|r| (r.id.clone(), r.component.clone()))
            .collect()
    }

    /// 컴포넌트와 라우트 목록 나열 (진단용)
    pub fn route_rows(&self) -> Vec<RouteRow> {
        let components = self.components.read();
        let mut rows = Vec::new();

        for record in components.values() {
            let routes = record.component.routes();
            if routes.is_empty() {
                rows.push(RouteRow {
                    component: record.name.clone(),
                    route: None,
                    handler: None,
                });
            } else {
                for (pattern, handler) in routes {
                    rows.push(RouteRow {
                        component: record.name.clone(),
                        route: Some(pattern),
                        handler: Some(handler),
                    });
                }
            }
        }

        rows.sort_by(|a, b| (&a.component, &a.route).cmp(&(&b.component, &b.route)));
        rows
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BusForwarder - 버블링 리스너
// ============================================================================

/// 수신한 모든 이벤트를 코디네이터 버스로 재발행하는 리스너
///
/// 레지스트리가 컴포넌트 emitter 에, 코디네이터가 스토어 emitter 에
/// 구독시킵니다. 필터링 없는 단방향 버블링입니다.
pub struct BusForwarder {
    bus: Arc<EventBus>,
}

impl BusForwarder {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EventListener for BusForwarder {
    fn name(&self) -> &str {
        "bus_forwarder"
    }

    async fn on_event(&self, event: &WaypointEvent) {
        self.bus.publish(event.clone()).await;
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use waypoint_foundation::Result;

    struct Stub {
        name: String,
        routes: Vec<(String, String)>,
    }

    #[async_trait]
    impl Component for Stub {
        fn name(&self) -> &str {
            &self.name
        }

        fn routes(&self) -> Vec<(String, String)> {
            self.routes.clone()
        }

        async fn invoke(&self, _handler: &str, _args: &[Value]) -> Result<()> {
            Ok(())
        }
    }

    fn record(id: &str, options: ComponentOptions) -> RegisteredComponent {
        RegisteredComponent {
            id: ComponentId::new(id).unwrap(),
            name: id.to_string(),
            component: Arc::new(Stub {
                name: id.to_string(),
                routes: Vec::new(),
            }),
            options,
            rendered: false,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let registry = ComponentRegistry::new();
        registry.insert(record("nav", ComponentOptions::default()));

        assert!(registry.contains("nav"));
        assert!(registry.entry("nav").is_some());
        assert!(registry.entry("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rendered_flag() {
        let registry = ComponentRegistry::new();
        registry.insert(record("nav", ComponentOptions::default()));

        assert!(!registry.is_rendered("nav"));
        registry.mark_rendered("nav");
        assert!(registry.is_rendered("nav"));
        registry.clear_rendered("nav");
        assert!(!registry.is_rendered("nav"));
    }

    #[test]
    fn test_sweep_candidates() {
        let registry = ComponentRegistry::new();
        registry.insert(record("page", ComponentOptions::default()));
        registry.insert(record("popup", ComponentOptions::popup()));
        registry.insert(record("modal", ComponentOptions::popup()));

        // 매칭된 컴포넌트 자신은 제외, remove_off_route 만 포함
        let candidates = registry.sweep_candidates("popup");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0.as_str(), "modal");
    }

    #[test]
    fn test_route_rows() {
        let registry = ComponentRegistry::new();
        registry.insert(RegisteredComponent {
            id: ComponentId::new("nav").unwrap(),
            name: "nav".to_string(),
            component: Arc::new(Stub {
                name: "nav".to_string(),
                routes: vec![("home".to_string(), "show".to_string())],
            }),
            options: ComponentOptions::default(),
            rendered: false,
        });
        registry.insert(record("bare", ComponentOptions::default()));

        let rows = registry.route_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].component, "bare");
        assert_eq!(rows[0].route, None);
        assert_eq!(rows[1].route.as_deref(), Some("home"));
    }
}
