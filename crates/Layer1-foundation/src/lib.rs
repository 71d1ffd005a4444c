//! # waypoint-foundation
//!
//! Foundation layer for Waypoint:
//! - Error: 중앙 에러 타입 (DuplicateRoute, MissingStoreImplementation 등)
//! - Event: 타입 이벤트 + EventBus + EventEmitter (컴포넌트 이벤트 버블링)
//! - Diag: 이름 기반 게이트 진단 로깅 (`log=` 디버그 플래그)
//! - Store: 공유 관찰형 key-value 저장소 (부트스트랩 스냅샷 초기화)
//! - Storage: JSON 파일 저장소 (설정/부트스트랩 로드)
//! - Config: 코디네이터 설정 (기본 컴포넌트 옵션, 디버그 플래그)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Layer2-core                                            │
//! │  ├── Coordinator (등록 / 라우트 디스패치)                │
//! │  └── Component trait 구현 (호스트 컴포넌트)              │
//! ├─────────────────────────────────────────────────────────┤
//! │  Layer1-foundation (이 레이어)                           │
//! │  ├── Event (버스 + emitter, 버블링 채널)                 │
//! │  ├── Store (공유 상태, 변경 재방송)                      │
//! │  ├── Diag (게이트 진단 로깅)                             │
//! │  └── Error / Config / Storage                           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod diag;
pub mod error;
pub mod event;
pub mod storage;
pub mod store;

// Error
pub use error::{Error, Result};

// Event
pub use event::{
    EventBus, EventBusConfig, EventCategory, EventEmitter, EventId, EventListener, EventSeverity,
    ListenerId, WaypointEvent,
};

// Diag
pub use diag::{DiagLogger, LogGate};

// Store
pub use store::{Bootstrap, MemoryStore, MemoryStoreFactory, SharedStore, StoreFactory};

// Storage
pub use storage::JsonStore;

// Config
pub use config::{ComponentOptions, Configurable, CoordinatorConfig};
