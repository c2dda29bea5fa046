use crate::models::{ActiveSession, ConnectionMode, SessionState};
use crate::utils::error::{LauncherError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Inspection handle for the one live session.
///
/// Cloning shares the same slot, so a debug console or test harness can hold
/// a registry while the launcher runs the session. The relay never depends on
/// it.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    current: Arc<RwLock<Option<ActiveSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the session; only one may be live at a time
    pub async fn register(&self, addr: &str, mode: Option<ConnectionMode>) -> Result<Uuid> {
        let mut current = self.current.write().await;

        if let Some(existing) = current.as_ref() {
            if !existing.state.is_terminal() {
                return Err(LauncherError::SessionAlreadyActive(existing.id.to_string()));
            }
        }

        let session = ActiveSession::new(addr, mode);
        let id = session.id;
        tracing::info!("Registered session {} for {}", id, addr);
        *current = Some(session);
        Ok(id)
    }

    /// Record a state transition
    pub async fn update_state(&self, session_id: Uuid, state: SessionState) -> Result<()> {
        self.with_session(session_id, |session| {
            tracing::debug!("Session {} -> {}", session_id, state.display_str());
            session.state = state;
        })
        .await
    }

    /// Count keyboard bytes posted to the engine
    pub async fn record_sent(&self, session_id: Uuid, bytes: usize) -> Result<()> {
        self.with_session(session_id, |session| {
            session.bytes_sent += bytes as u64;
            session.touch();
        })
        .await
    }

    /// Count display bytes printed to the terminal
    pub async fn record_received(&self, session_id: Uuid, bytes: usize) -> Result<()> {
        self.with_session(session_id, |session| {
            session.bytes_received += bytes as u64;
            session.touch();
        })
        .await
    }

    /// Snapshot of the current session
    pub async fn current(&self) -> Option<ActiveSession> {
        self.current.read().await.clone()
    }

    /// Whether a session is registered and still relaying
    pub async fn is_active(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| !s.state.is_terminal())
            .unwrap_or(false)
    }

    async fn with_session(&self, session_id: Uuid, f: impl FnOnce(&mut ActiveSession)) -> Result<()> {
        let mut current = self.current.write().await;
        match current.as_mut() {
            Some(session) if session.id == session_id => {
                f(session);
                Ok(())
            }
            _ => Err(LauncherError::SessionNotFound(session_id.to_string())),
        }
    }
}
