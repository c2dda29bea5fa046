use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Diagnostic log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    /// Unique log entry ID
    pub id: Uuid,

    /// Session ID (if applicable)
    pub session_id: Option<Uuid>,

    /// Log level
    pub level: LogLevel,

    /// Event type
    pub event: SessionEvent,

    /// Optional message
    pub message: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Diagnostic event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionEvent {
    /// Launcher initialization failed; no session was started
    InitFailed,

    /// `log` message from the engine
    EngineLog,

    /// `error` message from the engine
    EngineError,

    /// Inbound message with an unrecognized type
    UnknownMessage,

    /// Engine crashed
    EngineCrashed,
}

impl SessionLog {
    pub fn new(level: LogLevel, event: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: None,
            level,
            event,
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Format for display
    pub fn format(&self) -> String {
        let timestamp = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        let level = match self.level {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        };

        let event_desc = match self.event {
            SessionEvent::InitFailed => "Initialization failed",
            SessionEvent::EngineLog => "Engine log",
            SessionEvent::EngineError => "Engine error",
            SessionEvent::UnknownMessage => "Unknown message",
            SessionEvent::EngineCrashed => "Engine crashed",
        };

        let msg_part = self.message.as_ref()
            .map(|m| format!(" - {}", m))
            .unwrap_or_default();

        format!(
            "[{}] {} | {}{}{}",
            timestamp,
            level,
            event_desc,
            msg_part,
            self.session_id.map(|id| format!(" (session: {})", id)).unwrap_or_default()
        )
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_log_new() {
        let log = SessionLog::new(LogLevel::Info, SessionEvent::EngineLog);

        assert_eq!(log.level, LogLevel::Info);
        assert_eq!(log.event, SessionEvent::EngineLog);
        assert!(log.session_id.is_none());
        assert!(log.message.is_none());
    }

    #[test]
    fn test_session_log_with_session() {
        let session_id = Uuid::new_v4();
        let log = SessionLog::new(LogLevel::Info, SessionEvent::EngineLog).with_session(session_id);

        assert_eq!(log.session_id, Some(session_id));
    }

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warning.as_str(), "warning");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_format_with_message() {
        let log = SessionLog::new(LogLevel::Error, SessionEvent::EngineError)
            .with_message("Nothing received from server on UDP port 60001.");

        let formatted = log.format();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("Engine error"));
        assert!(formatted.contains("UDP port 60001"));
    }

    #[test]
    fn test_format_with_session() {
        let session_id = Uuid::new_v4();
        let log = SessionLog::new(LogLevel::Error, SessionEvent::EngineCrashed).with_session(session_id);

        let formatted = log.format();
        assert!(formatted.contains("Engine crashed"));
        assert!(formatted.contains(&session_id.to_string()));
    }

    #[test]
    fn test_log_serialization() {
        let log = SessionLog::new(LogLevel::Warning, SessionEvent::UnknownMessage).with_message("x");

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"UnknownMessage\""));

        let deserialized: SessionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.level, LogLevel::Warning);
        assert_eq!(deserialized.message.as_deref(), Some("x"));
    }
}
