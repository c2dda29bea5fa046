use crate::utils::text::payload_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name under which session key material is requested and stored
pub const SSH_KEY_NAME: &str = "ssh_key";

/// Message posted from the launcher to the engine.
///
/// Serialized externally tagged, so every message is a single-field object
/// such as `{"keyboard":"ls\r"}` or `{"window_change":5242904}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Raw keystroke or pasted bytes
    Keyboard(String),
    /// Terminal size packed as `(width << 16) | height`
    WindowChange(u32),
    /// Answer to `get_ssh_key`; `None` when the store has no entry
    SshKey(Option<String>),
}

impl OutboundMessage {
    pub fn window_change(width: u16, height: u16) -> Self {
        Self::WindowChange(pack_window_size(width, height))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Keyboard(_) => "keyboard",
            Self::WindowChange(_) => "window_change",
            Self::SshKey(_) => "ssh_key",
        }
    }
}

/// Packs a terminal size with the width in the high 16 bits.
pub fn pack_window_size(width: u16, height: u16) -> u32 {
    (u32::from(width) << 16) | u32::from(height)
}

/// Message received from the engine, dispatched on its `type` field
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Output for the terminal, printed verbatim
    Display(String),
    /// Diagnostic text, never shown in the terminal
    Log(String),
    /// Error text, shown in the terminal and logged
    Error(String),
    /// The engine wants the stored session key
    GetSshKey,
    /// Anything else; carries the whole original message
    Unknown(Value),
}

impl InboundMessage {
    pub fn from_value(value: Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        let data = value.get("data");

        match kind.as_deref() {
            Some("display") => Self::Display(payload_text(data)),
            Some("log") => Self::Log(payload_text(data)),
            Some("error") => Self::Error(payload_text(data)),
            Some("get_ssh_key") => Self::GetSshKey,
            _ => Self::Unknown(value),
        }
    }
}
