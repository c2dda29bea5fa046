//! Relay between the terminal widget and one engine instance.

use crate::models::{
    ConnectionParams, InboundMessage, LogLevel, OutboundMessage, PluginElement, SessionEvent, SessionState,
    SSH_KEY_NAME,
};
use crate::services::engine::{EngineEvent, EngineLoader, EnginePort};
use crate::services::log_service::LogService;
use crate::services::secret_store::SecretStore;
use crate::services::session_registry::SessionRegistry;
use crate::state::CredentialSlot;
use crate::ui::{TerminalEvent, TerminalIo};
use crate::utils::error::{LauncherError, Result};
use crate::utils::text::normalize_line_endings;
use serde_json::Value;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Printed before the engine is inserted; the load notice completes the line
pub const LOADING_NOTICE: &str = "Loading mosh client (takes a while the first time after an update)... ";
pub const LOADED_NOTICE: &str = "loaded.\r\n";
pub const CRASH_NOTICE: &str = "\r\nMosh client crashed.\r\n";

/// Collaborators a session needs besides the terminal
#[derive(Clone)]
pub struct SessionServices {
    pub loader: Arc<dyn EngineLoader>,
    pub secrets: Arc<dyn SecretStore>,
    pub log: Arc<LogService>,
    /// Key material handed to the engine at creation, read once
    pub credential: CredentialSlot,
}

/// Owns the lifecycle of one remote session
pub struct SessionController {
    io: Arc<dyn TerminalIo>,
    args: Option<ConnectionParams>,
    engine_src: String,
    services: SessionServices,
    registry: Option<(SessionRegistry, Uuid)>,
    state: SessionState,
    element: Option<PluginElement>,
    port: Option<Arc<dyn EnginePort>>,
}

impl SessionController {
    pub fn new(
        io: Arc<dyn TerminalIo>,
        args: ConnectionParams,
        engine_src: impl Into<String>,
        services: SessionServices,
    ) -> Self {
        Self {
            io,
            args: Some(args),
            engine_src: engine_src.into(),
            services,
            registry: None,
            state: SessionState::Created,
            element: None,
            port: None,
        }
    }

    /// Report state and traffic to a registry under `session_id`
    pub fn with_registry(mut self, registry: SessionRegistry, session_id: Uuid) -> Self {
        self.registry = Some((registry, session_id));
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The engine element, once created
    pub fn element(&self) -> Option<&PluginElement> {
        self.element.as_ref()
    }

    /// Create the engine element and begin loading it.
    ///
    /// Returns the engine's event stream. The connection parameters and the
    /// credential slot are consumed here whether or not the engine loads.
    pub fn start(&mut self) -> Result<mpsc::UnboundedReceiver<EngineEvent>> {
        if self.state != SessionState::Created {
            return Err(LauncherError::EngineError("session already started".to_string()));
        }
        let args = self
            .args
            .take()
            .ok_or_else(|| LauncherError::EngineError("connection parameters already consumed".to_string()))?;

        let ssh_key = self.services.credential.take();
        tracing::info!(
            "Starting session to {} (stored key: {})",
            args.display_name(),
            if ssh_key.is_some() { "yes" } else { "no" }
        );
        let element = PluginElement::configure(self.engine_src.clone(), args, ssh_key);

        self.state = SessionState::Loading;
        self.io.print(LOADING_NOTICE);

        let handle = self.services.loader.insert(&element);
        self.element = Some(element);
        self.port = Some(handle.port);

        Ok(handle.events)
    }

    /// Forward terminal input to the engine
    pub async fn handle_terminal_event(&self, event: TerminalEvent) {
        match event {
            TerminalEvent::Keystroke(bytes) | TerminalEvent::SendString(bytes) => {
                let len = bytes.len();
                self.post(&OutboundMessage::Keyboard(bytes));
                if let Some((registry, id)) = &self.registry {
                    if let Err(e) = registry.record_sent(*id, len).await {
                        tracing::debug!("Registry not updated: {}", e);
                    }
                }
            }
            TerminalEvent::Resize { width, height } => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                self.post(&OutboundMessage::window_change(width, height));
            }
        }
    }

    /// Apply one engine lifecycle event; `Break` once the session is over
    pub async fn handle_engine_event(&mut self, event: EngineEvent) -> ControlFlow<()> {
        match event {
            EngineEvent::Load => {
                self.io.print(LOADED_NOTICE);
                if let Some(element) = self.element.as_mut() {
                    let erased = element.erase_sensitive();
                    tracing::debug!("Engine loaded, erased {} credential attribute(s)", erased);
                }
                self.set_state(SessionState::Ready).await;
                ControlFlow::Continue(())
            }
            EngineEvent::Message(value) => {
                self.dispatch_inbound(value).await;
                ControlFlow::Continue(())
            }
            EngineEvent::Crash(reason) => {
                self.io.print(CRASH_NOTICE);
                self.log(
                    LogLevel::Error,
                    SessionEvent::EngineCrashed,
                    format!("Mosh client crashed: {}", reason),
                )
                .await;
                self.set_state(SessionState::Crashed).await;
                ControlFlow::Break(())
            }
            EngineEvent::Exit => {
                tracing::info!("Engine exited");
                self.set_state(SessionState::Closed).await;
                ControlFlow::Break(())
            }
        }
    }

    /// Handle one inbound message by its `type` tag
    pub async fn dispatch_inbound(&self, value: Value) {
        match InboundMessage::from_value(value) {
            InboundMessage::Display(text) => {
                self.io.print(&text);
                if let Some((registry, id)) = &self.registry {
                    if let Err(e) = registry.record_received(*id, text.len()).await {
                        tracing::debug!("Registry not updated: {}", e);
                    }
                }
            }
            InboundMessage::Log(text) => {
                self.log(LogLevel::Info, SessionEvent::EngineLog, text).await;
            }
            InboundMessage::Error(text) => {
                let text = normalize_line_endings(&text);
                self.io.print(&format!("{}\r\n", text));
                self.log(LogLevel::Error, SessionEvent::EngineError, text).await;
            }
            InboundMessage::GetSshKey => self.answer_ssh_key(),
            InboundMessage::Unknown(message) => {
                self.log(
                    LogLevel::Warning,
                    SessionEvent::UnknownMessage,
                    format!("Unknown message type: {}", message),
                )
                .await;
            }
        }
    }

    /// Relay events until the engine stops or the terminal goes away
    pub async fn run(mut self, mut terminal_events: mpsc::Receiver<TerminalEvent>) -> Result<SessionState> {
        let mut engine_events = self.start()?;

        loop {
            tokio::select! {
                event = engine_events.recv() => {
                    let event = event.unwrap_or_else(|| EngineEvent::Crash("engine went away".to_string()));
                    if self.handle_engine_event(event).await.is_break() {
                        break;
                    }
                }
                input = terminal_events.recv() => match input {
                    Some(input) => self.handle_terminal_event(input).await,
                    None => {
                        tracing::info!("Terminal input closed, ending session");
                        self.set_state(SessionState::Closed).await;
                        break;
                    }
                },
            }
        }

        Ok(self.state)
    }

    /// Look the key up in the background and post the answer when it resolves
    fn answer_ssh_key(&self) {
        let Some(port) = self.port.clone() else {
            tracing::warn!("get_ssh_key before the engine was inserted");
            return;
        };
        let secrets = self.services.secrets.clone();

        tokio::spawn(async move {
            let value = match secrets.get(SSH_KEY_NAME).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Secret store lookup failed: {}", e);
                    None
                }
            };
            if let Err(e) = port.post_message(&OutboundMessage::SshKey(value)) {
                tracing::warn!("Could not answer get_ssh_key: {}", e);
            }
        });
    }

    fn post(&self, message: &OutboundMessage) {
        let Some(port) = self.port.as_ref() else {
            tracing::debug!("Dropping {} message, engine not inserted", message.tag());
            return;
        };
        if let Err(e) = port.post_message(message) {
            tracing::warn!("Failed to post {} message: {}", message.tag(), e);
        }
    }

    async fn set_state(&mut self, state: SessionState) {
        self.state = state;
        if let Some((registry, id)) = &self.registry {
            if let Err(e) = registry.update_state(*id, state).await {
                tracing::debug!("Registry not updated: {}", e);
            }
        }
    }

    async fn log(&self, level: LogLevel, event: SessionEvent, message: String) {
        match &self.registry {
            Some((_, id)) => self.services.log.log_with_session(*id, level, event, message).await,
            None => self.services.log.log(level, event, message).await,
        }
    }
}
