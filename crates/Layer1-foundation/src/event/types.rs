//! Event Types - 시스템 전체에서 사용되는 이벤트 타입 정의
//!
//! 코디네이터, 컴포넌트, 스토어에서 발생하는 이벤트를 정의합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Event Category
// ============================================================================

/// 이벤트 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// 시스템 이벤트 (준비 완료, 설정 변경)
    System,
    /// 컴포넌트 생명주기 이벤트 (등록, 렌더, 제거)
    Component,
    /// 라우트 이벤트 (바인딩, 매칭, 변경)
    Route,
    /// 공유 스토어 변경 이벤트
    Store,
    /// 에러 이벤트
    Error,
    /// 사용자 정의 이벤트 (컴포넌트가 버블링하는 임의 이벤트)
    Custom,
}

impl EventCategory {
    /// 카테고리 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Component => "component",
            Self::Route => "route",
            Self::Store => "store",
            Self::Error => "error",
            Self::Custom => "custom",
        }
    }
}

// ============================================================================
// Event Severity
// ============================================================================

/// 이벤트 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    /// 디버그 정보
    Debug,
    /// 일반 정보
    Info,
    /// 경고
    Warning,
    /// 에러
    Error,
}

impl EventSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Default for EventSeverity {
    fn default() -> Self {
        Self::Info
    }
}

// ============================================================================
// WaypointEvent - 핵심 이벤트 타입
// ============================================================================

/// Waypoint 시스템 이벤트
///
/// 컴포넌트가 버블링하는 이벤트와 코디네이터가 직접 발행하는 이벤트의
/// 공통 구조입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 이벤트 타입 (예: "route.changed", "store.changed")
    pub event_type: String,

    /// 이벤트 카테고리
    pub category: EventCategory,

    /// 심각도
    pub severity: EventSeverity,

    /// 이벤트 발생 시간
    pub timestamp: DateTime<Utc>,

    /// 이벤트 소스 (컴포넌트 이름 또는 모듈)
    pub source: String,

    /// 이벤트 데이터
    pub data: Value,

    /// 추가 메타데이터
    pub metadata: HashMap<String, Value>,
}

impl WaypointEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: impl Into<String>, category: EventCategory) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            category,
            severity: EventSeverity::Info,
            timestamp: Utc::now(),
            source: String::new(),
            data: Value::Null,
            metadata: HashMap::new(),
        }
    }

    /// 심각도 설정
    pub fn with_severity(mut self, severity: EventSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// 소스 설정
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// 데이터 설정
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// 메타데이터 추가
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

// ============================================================================
// 사전 정의된 이벤트 타입들
// ============================================================================

/// 시스템 이벤트
pub mod system {
    use super::*;

    /// 준비 게이트 오픈 이벤트
    pub fn ready() -> WaypointEvent {
        WaypointEvent::new("system.ready", EventCategory::System).with_source("coordinator")
    }
}

/// 컴포넌트 생명주기 이벤트
pub mod component {
    use super::*;

    /// 컴포넌트 등록 이벤트
    pub fn registered(id: &str, name: &str) -> WaypointEvent {
        WaypointEvent::new("component.registered", EventCategory::Component)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id,
                "name": name,
            }))
    }

    /// 컴포넌트 렌더 완료 이벤트
    pub fn rendered(id: &str) -> WaypointEvent {
        WaypointEvent::new("component.rendered", EventCategory::Component)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id,
            }))
    }

    /// 컴포넌트 제거 이벤트 (라우트 이탈 스윕)
    pub fn removed(id: &str) -> WaypointEvent {
        WaypointEvent::new("component.removed", EventCategory::Component)
            .with_source("dispatcher")
            .with_data(serde_json::json!({
                "id": id,
            }))
    }
}

/// 라우트 이벤트
pub mod route {
    use super::*;

    /// 라우트 바인딩 이벤트 (라우터 어댑터에 패턴 등록)
    pub fn bound(pattern: &str, token: &str) -> WaypointEvent {
        WaypointEvent::new("route.bound", EventCategory::Route)
            .with_source("registry")
            .with_data(serde_json::json!({
                "pattern": pattern,
                "token": token,
            }))
    }

    /// 현재 라우트 변경 이벤트
    pub fn changed(token: &str, previous: Option<&str>) -> WaypointEvent {
        WaypointEvent::new("route.changed", EventCategory::Route)
            .with_source("dispatcher")
            .with_data(serde_json::json!({
                "token": token,
                "previous": previous,
            }))
    }
}

/// 스토어 이벤트
pub mod store {
    use super::*;

    /// 스토어 키 변경 이벤트
    pub fn changed(key: &str, value: &Value, old: Option<&Value>) -> WaypointEvent {
        WaypointEvent::new("store.changed", EventCategory::Store)
            .with_source("store")
            .with_data(serde_json::json!({
                "key": key,
                "value": value,
                "old": old,
            }))
    }
}

/// 에러 이벤트
pub mod error {
    use super::*;

    /// 일반 에러 이벤트
    pub fn occurred(source: &str, message: &str) -> WaypointEvent {
        WaypointEvent::new("error.occurred", EventCategory::Error)
            .with_severity(EventSeverity::Error)
            .with_source(source)
            .with_data(serde_json::json!({
                "message": message,
            }))
    }
}

// ============================================================================
// 테스트
// ============================================================================
