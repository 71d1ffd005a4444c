//! Coordinator - 컴포넌트 등록과 라우트 디스패치의 중심 컨텍스트
//!
//! 호스트 페이지가 명시적으로 생성해 컴포넌트에 주입하는 객체입니다.
//! 전역 싱글턴이 아니므로 테스트마다 독립된 인스턴스를 쓸 수 있습니다.
//!
//! 생명주기:
//! 1. `Coordinator::new(config)` - 닫힌 준비 게이트로 생성
//! 2. `register(component)` - 등록 작업을 큐에 적재
//! 3. `mark_ready()` - 게이트 오픈, 스토어 초기화, 큐 소진
//! 4. 라우터 어댑터가 `route_matched` 로 디스패치 트리거

use crate::component::{Component, ComponentId};
use crate::dispatch::Dispatcher;
use crate::queue::{DeferredQueue, QueuedTask};
use crate::registry::{BusForwarder, ComponentRegistry, RegisteredComponent, RouteRow};
use crate::router::{RouteSink, RouterAdapter};
use crate::routes::{compose_token, split_token, RouteTable, DEFAULT_HANDLER, DEFAULT_ROUTE};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use waypoint_foundation::event::types::{
    component as component_events, route as route_events, system as system_events,
};
use waypoint_foundation::{
    CoordinatorConfig, DiagLogger, Error, EventBus, Result, SharedStore,
};

// ============================================================================
// Coordinator
// ============================================================================

/// 코디네이터 컨텍스트
pub struct Coordinator {
    config: CoordinatorConfig,
    bus: Arc<EventBus>,
    queue: DeferredQueue,
    routes: RouteTable,
    registry: ComponentRegistry,
    dispatcher: Dispatcher,
    router: RwLock<Option<Arc<dyn RouterAdapter>>>,
    store: RwLock<Option<Arc<dyn SharedStore>>>,
    log: DiagLogger,
}

impl Coordinator {
    /// 닫힌 준비 게이트로 코디네이터 생성
    ///
    /// `attach_router` 가 `Weak` 싱크를 만들어야 하므로 `Arc` 로
    /// 반환합니다.
    pub fn new(config: CoordinatorConfig) -> Arc<Self> {
        let bus = Arc::new(EventBus::with_config(config.event_bus.clone()));
        let log = DiagLogger::new("coordinator", Arc::new(config.log_gate()));

        Arc::new(Self {
            config,
            bus,
            queue: DeferredQueue::new(),
            routes: RouteTable::new(),
            registry: ComponentRegistry::new(),
            dispatcher: Dispatcher::new(),
            router: RwLock::new(None),
            store: RwLock::new(None),
            log,
        })
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 컴포넌트 등록
    ///
    /// 등록 작업 전체가 큐에 적재됩니다. 준비 게이트가 이미 열려 있으면
    /// 즉시 소진되고, 닫혀 있으면 `mark_ready` 까지 대기합니다. 라우트
    /// 충돌 검사도 소진 시점에 일어납니다.
    pub async fn register(&self, component: Arc<dyn Component>) -> Result<()> {
        self.queue.push(QueuedTask::Register(component));

        if self.queue.is_open() {
            self.flush().await?;
        }

        Ok(())
    }

    /// 여러 컴포넌트 일괄 등록 (큐 적재 순서 유지)
    pub async fn register_many(
        &self,
        components: impl IntoIterator<Item = Arc<dyn Component>>,
    ) -> Result<()> {
        for component in components {
            self.register(component).await?;
        }
        Ok(())
    }

    // ========================================================================
    // 준비 게이트
    // ========================================================================

    /// 준비 완료 선언
    ///
    /// 최초 호출은 게이트를 열고 스토어를 초기화한 뒤 큐를 소진합니다.
    /// 이후 호출은 큐 소진만 다시 시도합니다 (에러로 중단된 소진 재개용).
    pub async fn mark_ready(&self) -> Result<()> {
        if self.queue.is_open() {
            return self.flush().await;
        }

        self.log.log("Waypoint ready!");
        self.queue.open();
        self.init_store().await?;
        self.flush().await?;

        self.bus.publish(system_events::ready()).await;
        Ok(())
    }

    /// 준비 게이트가 열려 있는지 확인
    pub fn is_ready(&self) -> bool {
        self.queue.is_open()
    }

    // ========================================================================
    // 큐 소진
    // ========================================================================

    /// 큐가 빌 때까지 작업을 FIFO 순서로 실행
    ///
    /// 작업은 실행 전에 제거되므로 실패한 작업은 재실행되지 않고, 실패
    /// 이후의 작업은 큐에 남아 다음 `mark_ready` 호출에서 재개됩니다.
    /// 실행 중 새로 적재된 작업도 같은 루프에서 소진됩니다.
    async fn flush(&self) -> Result<()> {
        while let Some(task) = self.queue.pop() {
            debug!(kind = task.kind(), "Running deferred task");
            self.run_task(task).await?;
        }
        Ok(())
    }

    async fn run_task(&self, task: QueuedTask) -> Result<()> {
        match task {
            QueuedTask::Register(component) => self.register_component(component).await,
            QueuedTask::Render(id) => self.render_component(&id).await,
            QueuedTask::BindRoute { pattern, token } => self.bind_route(&pattern, &token).await,
        }
    }

    /// 등록 작업 실행
    ///
    /// 순서가 계약입니다: 레코드 삽입과 렌더 예약이 라우트 바인딩보다
    /// 먼저 큐에 들어가므로, 같은 소진 루프 안에서 라우트가 발화해도
    /// 컴포넌트는 이미 레지스트리에 있습니다.
    async fn register_component(&self, component: Arc<dyn Component>) -> Result<()> {
        let id = match component.id() {
            Some(raw) => ComponentId::new(raw)?,
            None => ComponentId::generate(),
        };
        let name = component.name().to_string();
        let options = component.options().unwrap_or(self.config.default_options);

        if let Some(emitter) = component.emitter() {
            emitter
                .subscribe(Arc::new(BusForwarder::new(self.bus.clone())))
                .await;
        }

        self.registry.insert(RegisteredComponent {
            id: id.clone(),
            name: name.clone(),
            component: component.clone(),
            options,
            rendered: false,
        });

        if options.render_on_register {
            self.queue.push(QueuedTask::Render(id.clone()));
        }

        for (pattern, handler) in component.routes() {
            self.routes.add(&pattern, id.clone(), &handler)?;
            self.queue.push(QueuedTask::BindRoute {
                token: compose_token(&id, &handler),
                pattern,
            });
        }

        self.log.log(&format!("{} registered!", name));
        self.bus
            .publish(component_events::registered(id.as_str(), &name))
            .await;
        Ok(())
    }

    /// 렌더 작업 실행
    async fn render_component(&self, id: &ComponentId) -> Result<()> {
        let Some(component) = self.registry.component(id.as_str()) else {
            warn!(id = %id, "Render requested for unregistered component");
            return Ok(());
        };

        component.render().await?;
        self.registry.mark_rendered(id.as_str());

        self.log.log(&format!("{} rendered", component.name()));
        self.bus
            .publish(component_events::rendered(id.as_str()))
            .await;
        Ok(())
    }

    /// 라우트 바인딩 작업 실행
    ///
    /// 어댑터에 패턴을 등록한 뒤 현재 위치를 재평가합니다. 초기 로드
    /// 이후에 등록된 라우트가 현재 위치와 매칭되면 이 재평가가 즉시
    /// 디스패치를 발화합니다.
    async fn bind_route(&self, pattern: &str, token: &str) -> Result<()> {
        let router = self.router.read().clone();
        let Some(router) = router else {
            debug!(pattern, token, "No router attached, binding skipped");
            return Ok(());
        };

        router.add_pattern(pattern, token).await?;
        self.bus.publish(route_events::bound(pattern, token)).await;
        router.reevaluate().await
    }

    // ========================================================================
    // 라우터 / 스토어
    // ========================================================================

    /// 라우터 어댑터 연결
    ///
    /// 어댑터의 싱크를 이 코디네이터로 설정하고, 예약된 기본 라우트를
    /// 바인딩 큐에 적재합니다. 순환 참조를 피하기 위해 싱크는 `Weak` 로
    /// 전달합니다.
    pub async fn attach_router(self: &Arc<Self>, router: Arc<dyn RouterAdapter>) -> Result<()> {
        let sink: std::sync::Weak<dyn RouteSink> =
            Arc::downgrade(&(Arc::clone(self) as Arc<dyn RouteSink>));
        router.set_sink(sink);
        *self.router.write() = Some(router);

        self.queue.push(QueuedTask::BindRoute {
            pattern: DEFAULT_ROUTE.to_string(),
            token: compose_token(&ComponentId::coordinator(), DEFAULT_HANDLER),
        });

        if self.queue.is_open() {
            self.flush().await?;
        }

        Ok(())
    }

    /// 스토어 초기화
    ///
    /// 팩토리가 없으면 `MissingStoreImplementation`. 생성된 스토어의
    /// emitter 를 구독해 변경 이벤트를 버스로 재방송합니다.
    async fn init_store(&self) -> Result<()> {
        let factory = self
            .config
            .store_factory
            .as_ref()
            .ok_or(Error::MissingStoreImplementation)?;

        let store = factory.create(self.config.bootstrap.clone());
        store
            .emitter()
            .subscribe(Arc::new(BusForwarder::new(self.bus.clone())))
            .await;

        *self.store.write() = Some(store);
        self.log.log("store initialized");
        Ok(())
    }

    // ========================================================================
    // 디스패치
    // ========================================================================

    /// 매칭된 라우트 토큰 처리
    ///
    /// 현재 토큰과 같으면 전체가 no-op 입니다. 다르면 라우트 변경
    /// 이벤트를 발행하고, 소유 컴포넌트의 핸들러를 호출한 뒤, 이탈
    /// 스윕을 수행합니다.
    async fn handle_route(&self, token: &str, args: &[Value]) -> Result<()> {
        let Some(previous) = self.dispatcher.accept(token) else {
            self.log.log(&format!("route '{}' already current", token));
            return Ok(());
        };

        self.log.log(&format!("route changed to '{}'", token));
        self.bus
            .publish(route_events::changed(token, previous.as_deref()))
            .await;

        let (owner, handler) = split_token(token).unwrap_or((token, ""));

        if let Some(entry) = self.registry.entry(owner) {
            // render 핸들러 자체는 이중 렌더를 피해 옵션 경로를 건너뜀
            if handler != "render" && entry.options.render_on_route && !entry.rendered {
                self.queue.push(QueuedTask::Render(entry.id.clone()));
                if self.queue.is_open() {
                    self.flush().await?;
                }
            }

            if !handler.is_empty() {
                entry
                    .component
                    .invoke(handler, args)
                    .await
                    .map_err(|e| Error::component(entry.id.as_str(), e.to_string()))?;
            }
        } else if owner != ComponentId::coordinator().as_str() {
            // 등록 전에 발화된 토큰은 허용 (로그만 남김)
            debug!(token, owner, "Route token has no registered owner");
        }

        self.sweep(owner).await
    }

    /// 라우트 이탈 스윕
    ///
    /// 방금 매칭된 컴포넌트를 제외하고 `remove_off_route` 가 설정된
    /// 컴포넌트를 모두 제거합니다.
    async fn sweep(&self, except: &str) -> Result<()> {
        for (id, component) in self.registry.sweep_candidates(except) {
            component.remove().await?;
            self.registry.clear_rendered(id.as_str());

            self.log.log(&format!("{} removed (off route)", component.name()));
            self.bus
                .publish(component_events::removed(id.as_str()))
                .await;
        }
        Ok(())
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 공유 스토어 (준비 전에는 None)
    pub fn store(&self) -> Option<Arc<dyn SharedStore>> {
        self.store.read().clone()
    }

    /// 이벤트 버스
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    /// 마지막으로 디스패치된 라우트 토큰
    pub fn current_route(&self) -> Option<String> {
        self.dispatcher.current()
    }

    /// 등록된 컴포넌트 수
    pub fn component_count(&self) -> usize {
        self.registry.len()
    }

    /// 등록된 컴포넌트와 라우트 나열 (진단용)
    pub fn list(&self) -> Vec<RouteRow> {
        self.registry.route_rows()
    }

    /// 바인딩된 라우트 패턴 목록 (기본 라우트 포함)
    pub fn route_patterns(&self) -> Vec<String> {
        self.routes.patterns()
    }

    /// 코디네이터와 게이트를 공유하는 이름 접두 로거 생성
    pub fn diag(&self, name: impl Into<String>) -> DiagLogger {
        self.log.named(name)
    }
}

#[async_trait]
impl RouteSink for Coordinator {
    async fn route_matched(&self, token: &str, args: &[Value]) -> Result<()> {
        self.handle_route(token, args).await
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        id: &'static str,
        renders: AtomicUsize,
    }

    #[async_trait]
    impl Component for Probe {
        fn id(&self) -> Option<&str> {
            Some(self.id)
        }

        fn name(&self) -> &str {
            self.id
        }

        async fn render(&self) -> Result<()> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn invoke(&self, _handler: &str, _args: &[Value]) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_registration_deferred_until_ready() {
        let coordinator = Coordinator::new(CoordinatorConfig::default());
        let probe = Arc::new(Probe {
            id: "c1",
            renders: AtomicUsize::new(0),
        });

        coordinator.register(probe.clone()).await.unwrap();
        assert_eq!(coordinator.component_count(), 0);
        assert_eq!(probe.renders.load(Ordering::SeqCst), 0);

        coordinator.mark_ready().await.unwrap();
        assert_eq!(coordinator.component_count(), 1);
        // 기본 옵션은 render_on_register
        assert_eq!(probe.renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_after_ready_runs_immediately() {
        let coordinator = Coordinator::new(CoordinatorConfig::default());
        coordinator.mark_ready().await.unwrap();

        let probe = Arc::new(Probe {
            id: "late",
            renders: AtomicUsize::new(0),
        });
        coordinator.register(probe.clone()).await.unwrap();

        assert_eq!(probe.renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_store_factory() {
        let coordinator = Coordinator::new(CoordinatorConfig::default().without_store());
        let err = coordinator.mark_ready().await.unwrap_err();
        assert!(matches!(err, Error::MissingStoreImplementation));
    }

    #[tokio::test]
    async fn test_dashed_caller_id_rejected() {
        let coordinator = Coordinator::new(CoordinatorConfig::default());

        struct Dashed;

        #[async_trait]
        impl Component for Dashed {
            fn id(&self) -> Option<&str> {
                Some("my-nav")
            }

            fn name(&self) -> &str {
                "dashed"
            }

            async fn invoke(&self, _handler: &str, _args: &[Value]) -> Result<()> {
                Ok(())
            }
        }

        coordinator.register(Arc::new(Dashed)).await.unwrap();
        let err = coordinator.mark_ready().await.unwrap_err();
        assert!(matches!(err, Error::InvalidComponentId(_)));
    }
}
