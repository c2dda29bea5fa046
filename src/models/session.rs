use super::ConnectionMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of the session controller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Created,
    Loading,
    Ready,
    Crashed,
    Closed,
}

impl SessionState {
    /// Whether the relay loop has stopped for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Crashed | Self::Closed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Crashed)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Loading => "Loading...",
            Self::Ready => "Ready",
            Self::Crashed => "Crashed",
            Self::Closed => "Closed",
        }
    }
}

/// Snapshot of the live session, as exposed by the session registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    /// Unique session identifier
    pub id: Uuid,

    /// Target address shown in the window title
    pub addr: String,

    /// Selected connection mode, if any
    pub mode: Option<ConnectionMode>,

    /// Current state
    pub state: SessionState,

    /// When the session was started
    pub started_at: DateTime<Utc>,

    /// Last relayed message in either direction
    pub last_activity: DateTime<Utc>,

    /// Keyboard bytes posted to the engine
    #[serde(default)]
    pub bytes_sent: u64,

    /// Display bytes printed to the terminal
    #[serde(default)]
    pub bytes_received: u64,
}

impl ActiveSession {
    pub fn new(addr: impl Into<String>, mode: Option<ConnectionMode>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            addr: addr.into(),
            mode,
            state: SessionState::Created,
            started_at: now,
            last_activity: now,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Get duration since session started
    pub fn duration(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// Format duration for display
    pub fn format_duration(&self) -> String {
        let duration = self.duration();
        let hours = duration.num_hours();
        let minutes = duration.num_minutes() % 60;
        let seconds = duration.num_seconds() % 60;

        if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Format traffic for display
    pub fn format_traffic(&self) -> String {
        format!(
            "sent {}, received {}",
            format_bytes(self.bytes_sent),
            format_bytes(self.bytes_received)
        )
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
