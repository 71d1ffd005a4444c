//! # waypoint-core
//!
//! Core layer for Waypoint:
//! - Coordinator: 등록 / 준비 게이트 / 라우트 디스패치의 중심 컨텍스트
//! - Component: 호스트가 구현하는 등록 단위 (라우트 선언 + 생명주기)
//! - Queue: 준비 게이트 전까지 작업을 보관하는 FIFO 큐
//! - Routes: 패턴 유일성과 복합 토큰 `"<ownerId>-<handlerName>"`
//! - Registry: 살아 있는 컴포넌트 북키핑 (렌더 플래그, 스윕 대상)
//! - Dispatch: 현재 라우트 토큰 상태 머신 (재진입 no-op)
//! - Router: 외부 라우터 경계 (`RouterAdapter` / `RouteSink`)
//!
//! ## 사용 흐름
//!
//! ```text
//! let coordinator = Coordinator::new(config);
//! coordinator.register(component).await?;   // 큐 적재
//! coordinator.attach_router(router).await?; // 기본 라우트 바인딩
//! coordinator.mark_ready().await?;          // 게이트 오픈 + 소진
//! router.navigate("home").await?;           // 디스패치
//! ```

pub mod component;
pub mod coordinator;
pub mod dispatch;
pub mod queue;
pub mod registry;
pub mod router;
pub mod routes;

pub use component::{Component, ComponentId};
pub use coordinator::Coordinator;
pub use dispatch::Dispatcher;
pub use queue::{DeferredQueue, QueuedTask};
pub use registry::{BusForwarder, ComponentEntry, ComponentRegistry, RegisteredComponent, RouteRow};
pub use router::{InMemoryRouter, RouteSink, RouterAdapter};
pub use routes::{compose_token, split_token, RouteBinding, RouteTable, DEFAULT_HANDLER, DEFAULT_ROUTE};

// 호스트 코드가 foundation 을 따로 의존하지 않도록 주요 타입 재노출
pub use waypoint_foundation::{
    Bootstrap, ComponentOptions, CoordinatorConfig, DiagLogger, Error, EventBus, EventEmitter,
    EventListener, Result, SharedStore, StoreFactory, WaypointEvent,
};
