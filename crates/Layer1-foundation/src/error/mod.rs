//! Error types for Waypoint
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Waypoint 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 라우트 관련
    // ========================================================================
    #[error("The route '{0}' has already been registered")]
    DuplicateRoute(String),

    #[error("Component id '{0}' must not contain '-'")]
    InvalidComponentId(String),

    // ========================================================================
    // 저장소 관련
    // ========================================================================
    #[error("No store implementation has been configured")]
    MissingStoreImplementation,

    #[error("Storage error: {0}")]
    Storage(String),

    // ========================================================================
    // 컴포넌트 관련
    // ========================================================================
    #[error("Please implement the '{0}' operation")]
    Unimplemented(String),

    #[error("Component error: {component} - {message}")]
    Component { component: String, message: String },

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 호스트가 복구할 수 없는 에러인지 확인
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MissingStoreImplementation)
    }

    /// 등록 단계에서 발생하는 에러인지 확인
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Error::DuplicateRoute(_) | Error::InvalidComponentId(_)
        )
    }

    /// Unimplemented 에러 생성 헬퍼
    pub fn unimplemented(operation: impl Into<String>) -> Self {
        Error::Unimplemented(operation.into())
    }

    /// Component 에러 생성 헬퍼
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::MissingStoreImplementation.is_fatal());
        assert!(!Error::DuplicateRoute("home".to_string()).is_fatal());
    }

    #[test]
    fn test_registration_classification() {
        assert!(Error::DuplicateRoute("home".to_string()).is_registration());
        assert!(Error::InvalidComponentId("a-b".to_string()).is_registration());
        assert!(!Error::Internal("x".to_string()).is_registration());
    }

    #[test]
    fn test_helpers() {
        let err = Error::unimplemented("render");
        assert_eq!(err.to_string(), "Please implement the 'render' operation");

        let err = Error::component("nav", "boom");
        assert_eq!(err.to_string(), "Component error: nav - boom");
    }
}
