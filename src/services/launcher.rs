use crate::models::{LogLevel, SessionEvent, SessionState};
use crate::services::config_service::LauncherSettings;
use crate::services::engine::ProcessEngine;
use crate::services::log_service::LogService;
use crate::services::session_controller::{SessionController, SessionServices};
use crate::services::session_registry::SessionRegistry;
use crate::state::ConnectionForm;
use crate::ui::TerminalFactory;
use crate::utils::error::{LauncherError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Turns a submitted setup form into a running session
pub struct Launcher {
    settings: LauncherSettings,
    form: Option<ConnectionForm>,
    services: SessionServices,
    registry: SessionRegistry,
}

impl Launcher {
    pub fn new(settings: LauncherSettings, form: ConnectionForm, services: SessionServices) -> Self {
        Self {
            settings,
            form: Some(form),
            services,
            registry: SessionRegistry::new(),
        }
    }

    /// Use an existing registry, e.g. one a debug console already holds
    pub fn with_registry(mut self, registry: SessionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> SessionRegistry {
        self.registry.clone()
    }

    pub fn log(&self) -> &Arc<LogService> {
        &self.services.log
    }

    /// The setup form, until a connect consumed it
    pub fn form_mut(&mut self) -> Option<&mut ConnectionForm> {
        self.form.as_mut()
    }

    /// One-time preparation before any session: locate the engine executable
    pub async fn initialize(&self) -> Result<PathBuf> {
        let src = self.settings.engine_path.clone();
        tokio::task::spawn_blocking(move || ProcessEngine::resolve(&src))
            .await
            .map_err(|e| LauncherError::InitFailed(format!("engine lookup aborted: {}", e)))?
    }

    /// Connect with whatever the form holds.
    ///
    /// Returns `Ok(None)` when initialization failed; the failure is logged and
    /// the form stays in place. Otherwise the form is consumed and the final
    /// session state is returned once the session ends.
    pub async fn on_connect(&mut self, factory: &dyn TerminalFactory) -> Result<Option<SessionState>> {
        if self.form.is_none() {
            return Err(LauncherError::SetupAlreadyConsumed);
        }
        // Checked before the terminal goes raw; a shared registry may hold a live session
        if self.registry.is_active().await {
            let id = self.registry.current().await.map(|s| s.id.to_string()).unwrap_or_default();
            return Err(LauncherError::SessionAlreadyActive(id));
        }

        let engine = match self.initialize().await {
            Ok(engine) => engine,
            Err(e) => {
                self.services
                    .log
                    .log(LogLevel::Error, SessionEvent::InitFailed, e.to_string())
                    .await;
                return Ok(None);
            }
        };

        let form = self.form.take().ok_or(LauncherError::SetupAlreadyConsumed)?;
        let params = form.collect_params();
        drop(form);

        let terminal = factory.decorate()?;
        terminal.io.set_title(&format!("{} - {}", self.settings.title, params.addr));

        terminal
            .ready
            .await
            .map_err(|_| LauncherError::TerminalError("terminal closed before it was ready".to_string()))?;

        terminal.io.set_cursor_position(0, 0);
        terminal.io.set_cursor_visible(true);

        let session_id = self.registry.register(&params.addr, params.mode).await?;
        let controller = SessionController::new(
            terminal.io,
            params,
            engine.to_string_lossy().into_owned(),
            self.services.clone(),
        )
        .with_registry(self.registry.clone(), session_id);

        let state = controller.run(terminal.events).await?;
        tracing::info!("Session {} ended: {}", session_id, state.display_str());
        Ok(Some(state))
    }
}
