//! Event - 타입 이벤트, 버스, 컴포넌트 발신기
//!
//! - `types` - `WaypointEvent` 와 사전 정의 이벤트 생성자
//! - `bus` - 코디네이터 레벨 브로드캐스트 (`EventBus`)
//! - `emitter` - 컴포넌트 단위 any-event 채널 (`EventEmitter`)

pub mod bus;
pub mod emitter;
pub mod types;

pub use bus::{EventBus, EventBusConfig, EventListener, ListenerId};
pub use emitter::EventEmitter;
pub use types::{EventCategory, EventId, EventSeverity, WaypointEvent};
