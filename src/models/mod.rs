pub mod connection;
pub mod log;
pub mod message;
pub mod plugin;
pub mod session;

// Re-export main types
pub use connection::{ConnectionMode, ConnectionParams};
pub use log::{LogLevel, SessionEvent, SessionLog};
pub use message::{InboundMessage, OutboundMessage, SSH_KEY_NAME};
pub use plugin::PluginElement;
pub use session::{ActiveSession, SessionState};
