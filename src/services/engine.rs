//! Host side of the protocol engine boundary.
//!
//! The engine is opaque: it receives the element attributes once, then
//! exchanges single JSON messages with the controller. [`ProcessEngine`] runs
//! it as a child process speaking newline-delimited JSON over stdio.

use crate::models::{OutboundMessage, PluginElement};
use crate::utils::error::{LauncherError, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot};

/// Lifecycle and message events raised by an engine instance
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine accepted its attributes and is running
    Load,
    /// One inbound message
    Message(Value),
    /// The engine died; carries a short reason
    Crash(String),
    /// The engine finished on its own
    Exit,
}

/// Fire-and-forget message channel into a running engine
pub trait EnginePort: Send + Sync {
    fn post_message(&self, message: &OutboundMessage) -> Result<()>;
}

/// A started engine: where to post messages and where its events arrive
pub struct EngineHandle {
    pub port: Arc<dyn EnginePort>,
    pub events: mpsc::UnboundedReceiver<EngineEvent>,
}

/// Instantiates engines from a configured element
pub trait EngineLoader: Send + Sync {
    /// Begin loading the engine described by `element`.
    ///
    /// Never fails synchronously; a failure to start is reported as
    /// [`EngineEvent::Crash`] on the returned handle.
    fn insert(&self, element: &PluginElement) -> EngineHandle;
}

/// Runs the engine executable named by the element's `src` attribute
pub struct ProcessEngine {
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Find the engine executable, either as a path or on `PATH`
    pub fn resolve(src: &str) -> Result<PathBuf> {
        which::which(src)
            .map_err(|e| LauncherError::InitFailed(format!("engine executable not found: {} ({})", src, e)))
    }

    fn spawn(&self, src: &str) -> std::io::Result<Child> {
        Command::new(src)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}

impl EngineLoader for ProcessEngine {
    fn insert(&self, element: &PluginElement) -> EngineHandle {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let port = Arc::new(ProcessPort { lines: line_tx });

        let Some(src) = element.src() else {
            let _ = event_tx.send(EngineEvent::Crash("element has no src".to_string()));
            return EngineHandle { port, events };
        };

        match self.spawn(src) {
            Ok(child) => {
                tracing::info!("Started engine {} (pid {:?})", src, child.id());
                let attributes = json!({ "attributes": element.attributes() }).to_string();
                supervise(child, attributes, line_rx, event_tx);
            }
            Err(e) => {
                tracing::error!("Failed to start engine {}: {}", src, e);
                let _ = event_tx.send(EngineEvent::Crash(format!("failed to start {}: {}", src, e)));
            }
        }

        EngineHandle { port, events }
    }
}

struct ProcessPort {
    lines: mpsc::UnboundedSender<String>,
}

impl EnginePort for ProcessPort {
    fn post_message(&self, message: &OutboundMessage) -> Result<()> {
        let line = serde_json::to_string(message)?;
        self.lines
            .send(line)
            .map_err(|_| LauncherError::EngineError("engine input is closed".to_string()))
    }
}

fn supervise(
    mut child: Child,
    attributes: String,
    mut lines: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<EngineEvent>,
) {
    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
        let _ = events.send(EngineEvent::Crash("engine stdio unavailable".to_string()));
        return;
    };
    let stderr = child.stderr.take();
    let (loaded_tx, loaded_rx) = oneshot::channel::<()>();

    // Writer: attributes first, then queued messages in order
    let load_events = events.clone();
    tokio::spawn(async move {
        let mut stdin = stdin;
        if let Err(e) = write_line(&mut stdin, &attributes).await {
            tracing::error!("Failed to hand attributes to engine: {}", e);
            return;
        }
        let _ = load_events.send(EngineEvent::Load);
        let _ = loaded_tx.send(());

        while let Some(line) = lines.recv().await {
            if let Err(e) = write_line(&mut stdin, &line).await {
                tracing::warn!("Engine input closed: {}", e);
                break;
            }
        }
    });

    // Reader: one JSON message per line, only after Load went out
    let message_events = events.clone();
    let reader = tokio::spawn(async move {
        let _ = loaded_rx.await;
        let mut reader = BufReader::new(stdout).lines();
        loop {
            match reader.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<Value>(&line) {
                    Ok(value) => {
                        if message_events.send(EngineEvent::Message(value)).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("Skipping malformed engine output ({}): {:?}", e, line),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Engine output closed: {}", e);
                    break;
                }
            }
        }
    });

    if let Some(stderr) = stderr {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                tracing::debug!("engine: {}", line);
            }
        });
    }

    tokio::spawn(async move {
        let event = match child.wait().await {
            Ok(status) if status.success() => EngineEvent::Exit,
            Ok(status) => EngineEvent::Crash(format!("engine exited with {}", status)),
            Err(e) => EngineEvent::Crash(format!("failed to wait for engine: {}", e)),
        };
        // Deliver everything the engine printed before it went away
        let _ = reader.await;
        let _ = events.send(event);
    });
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}
