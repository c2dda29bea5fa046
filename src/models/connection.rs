use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Connection strategy selected in the setup form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Bootstrap the mosh server over SSH, authenticating as a username
    #[default]
    Ssh,
    /// Attach to an already running mosh server with its session key
    Manual,
}

impl ConnectionMode {
    pub const ALL: [ConnectionMode; 2] = [ConnectionMode::Ssh, ConnectionMode::Manual];

    /// Value sent to the engine in the `mode` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Manual => "manual",
        }
    }

    /// Port the form displays when this mode is selected
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Ssh => 22,
            Self::Manual => 60001,
        }
    }

    pub fn shows_username(&self) -> bool {
        matches!(self, Self::Ssh)
    }

    pub fn shows_key(&self) -> bool {
        matches!(self, Self::Manual)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Self::Ssh => "SSH (start mosh-server over ssh)",
            Self::Manual => "Manual (existing mosh-server and key)",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(Self::Ssh),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown connection mode: {}", other)),
        }
    }
}

/// Parameters captured from the setup form when the user connects.
///
/// Values are forwarded to the engine verbatim; the engine is the only
/// validator. `key` may be a live session key, so it is redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub addr: String,
    pub port: String,
    pub user: String,
    pub key: String,
    pub mode: Option<ConnectionMode>,
}

impl ConnectionParams {
    pub fn new(
        addr: impl Into<String>,
        port: impl Into<String>,
        user: impl Into<String>,
        key: impl Into<String>,
        mode: Option<ConnectionMode>,
    ) -> Self {
        Self {
            addr: addr.into(),
            port: port.into(),
            user: user.into(),
            key: key.into(),
            mode,
        }
    }

    /// Get a display string for the connection
    pub fn display_name(&self) -> String {
        if self.user.is_empty() || self.mode == Some(ConnectionMode::Manual) {
            format!("{}:{}", self.addr, self.port)
        } else {
            format!("{}@{}:{}", self.user, self.addr, self.port)
        }
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("addr", &self.addr)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("mode", &self.mode)
            .finish()
    }
}
