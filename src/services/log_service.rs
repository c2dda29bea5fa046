use crate::models::{LogLevel, SessionEvent, SessionLog};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Diagnostic log of the session.
///
/// Keeps the most recent entries in memory and mirrors each one through
/// `tracing`. Nothing logged here is ever printed to the terminal.
pub struct LogService {
    /// In-memory log buffer (most recent logs)
    logs: Arc<RwLock<VecDeque<SessionLog>>>,

    /// Maximum logs to keep in memory
    max_memory_logs: usize,
}

impl LogService {
    /// Create a new log service
    pub fn new(max_memory_logs: usize) -> Self {
        Self {
            logs: Arc::new(RwLock::new(VecDeque::with_capacity(max_memory_logs))),
            max_memory_logs,
        }
    }

    /// Log a diagnostic event
    pub async fn log(&self, level: LogLevel, event: SessionEvent, message: impl Into<String>) {
        self.log_entry(SessionLog::new(level, event).with_message(message)).await
    }

    /// Log a diagnostic event tied to a session
    pub async fn log_with_session(
        &self,
        session_id: Uuid,
        level: LogLevel,
        event: SessionEvent,
        message: impl Into<String>,
    ) {
        let entry = SessionLog::new(level, event)
            .with_session(session_id)
            .with_message(message);
        self.log_entry(entry).await
    }

    /// Log a pre-built log entry
    pub async fn log_entry(&self, log_entry: SessionLog) {
        {
            let mut logs = self.logs.write().await;

            // Remove oldest if at capacity
            if logs.len() >= self.max_memory_logs {
                logs.pop_front();
            }

            logs.push_back(log_entry.clone());
        }

        match log_entry.level {
            LogLevel::Info => tracing::info!("{}", log_entry.format()),
            LogLevel::Warning => tracing::warn!("{}", log_entry.format()),
            LogLevel::Error => tracing::error!("{}", log_entry.format()),
        }
    }

    /// Get all logs in memory
    pub async fn get_logs(&self) -> Vec<SessionLog> {
        let logs = self.logs.read().await;
        logs.iter().cloned().collect()
    }

    /// Get logs for a specific session
    pub async fn get_logs_for_session(&self, session_id: Uuid) -> Vec<SessionLog> {
        let logs = self.logs.read().await;
        logs.iter()
            .filter(|log| log.session_id == Some(session_id))
            .cloned()
            .collect()
    }

    /// Get logs filtered by level
    pub async fn get_logs_by_level(&self, level: LogLevel) -> Vec<SessionLog> {
        let logs = self.logs.read().await;
        logs.iter()
            .filter(|log| log.level == level)
            .cloned()
            .collect()
    }

    /// Get logs for one event type
    pub async fn get_logs_by_event(&self, event: &SessionEvent) -> Vec<SessionLog> {
        let logs = self.logs.read().await;
        logs.iter()
            .filter(|log| &log.event == event)
            .cloned()
            .collect()
    }

    /// Number of entries currently held
    pub async fn len(&self) -> usize {
        self.logs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.logs.read().await.is_empty()
    }

    /// Get recent logs (last N)
    pub async fn get_recent(&self, count: usize) -> Vec<SessionLog> {
        let logs = self.logs.read().await;
        logs.iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_and_get() {
        let service = LogService::new(10);
        service.log(LogLevel::Info, SessionEvent::EngineLog, "hello").await;

        let logs = service.get_logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let service = LogService::new(3);
        for i in 0..5 {
            service.log(LogLevel::Info, SessionEvent::EngineLog, format!("msg {}", i)).await;
        }

        let logs = service.get_logs().await;
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message.as_deref(), Some("msg 2"));
        assert_eq!(logs[2].message.as_deref(), Some("msg 4"));
    }

    #[tokio::test]
    async fn test_filter_by_level_and_event() {
        let service = LogService::new(10);
        service.log(LogLevel::Info, SessionEvent::EngineLog, "a").await;
        service.log(LogLevel::Error, SessionEvent::EngineError, "b").await;
        service.log(LogLevel::Error, SessionEvent::EngineCrashed, "c").await;

        assert_eq!(service.get_logs_by_level(LogLevel::Error).await.len(), 2);
        assert_eq!(service.get_logs_by_event(&SessionEvent::EngineCrashed).await.len(), 1);
    }

    #[tokio::test]
    async fn test_logs_for_session() {
        let service = LogService::new(10);
        let session_id = Uuid::new_v4();
        service.log_with_session(session_id, LogLevel::Info, SessionEvent::EngineLog, "a").await;
        service.log(LogLevel::Info, SessionEvent::EngineLog, "b").await;

        let logs = service.get_logs_for_session(session_id).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_recent() {
        let service = LogService::new(10);
        for i in 0..4 {
            service.log(LogLevel::Info, SessionEvent::EngineLog, i.to_string()).await;
        }

        let recent = service.get_recent(2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message.as_deref(), Some("2"));
        assert_eq!(recent[1].message.as_deref(), Some("3"));
    }
}
