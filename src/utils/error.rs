use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Initialization failed: {0}")]
    InitFailed(String),

    #[error("Private key file not found: {0}")]
    KeyFileNotFound(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Connection form has already been submitted")]
    SetupAlreadyConsumed,

    #[error("A session is already active: {0}")]
    SessionAlreadyActive(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Prompt error: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::de::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LauncherError>;

impl LauncherError {
    /// Returns a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::KeyFileNotFound(path) => format!("Private key file not found: {}", path),
            Self::InvalidKey(reason) => format!("Not an OpenSSH private key: {}", reason),
            Self::InitFailed(reason) => format!("Could not prepare the mosh engine: {}", reason),
            Self::EngineError(reason) => format!("Mosh engine error: {}", reason),
            Self::TerminalError(reason) => format!("Terminal error: {}", reason),
            Self::ConfigError(reason) => format!("Configuration error: {}", reason),
            Self::SetupAlreadyConsumed => "The connection form can only be submitted once".to_string(),
            Self::SessionAlreadyActive(id) => format!("Session {} is still running", id),
            _ => self.to_string(),
        }
    }
}

/// Message for the top-level error report, friendlier when it is ours
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LauncherError>() {
        Some(launcher_err) => launcher_err.user_message(),
        None => err.to_string(),
    }
}
