//! Test doubles for the terminal widget, the engine and the secret store.
#![allow(dead_code)]

use async_trait::async_trait;
use mosh_launcher::models::{OutboundMessage, PluginElement};
use mosh_launcher::services::engine::{EngineEvent, EngineHandle, EngineLoader, EnginePort};
use mosh_launcher::services::secret_store::SecretStore;
use mosh_launcher::ui::{DecoratedTerminal, TerminalEvent, TerminalFactory, TerminalIo};
use mosh_launcher::utils::error::{LauncherError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Terminal output sink that remembers everything it was asked to do
#[derive(Default)]
pub struct RecordingIo {
    pub printed: Mutex<String>,
    pub titles: Mutex<Vec<String>>,
    pub cursor: Mutex<Option<(u16, u16)>>,
    pub cursor_visible: Mutex<Option<bool>>,
}

impl RecordingIo {
    pub fn printed(&self) -> String {
        self.printed.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.printed.lock().unwrap().clear();
    }
}

impl TerminalIo for RecordingIo {
    fn print(&self, text: &str) {
        self.printed.lock().unwrap().push_str(text);
    }

    fn set_cursor_position(&self, row: u16, column: u16) {
        *self.cursor.lock().unwrap() = Some((row, column));
    }

    fn set_cursor_visible(&self, visible: bool) {
        *self.cursor_visible.lock().unwrap() = Some(visible);
    }

    fn set_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }
}

/// Terminal factory handing out a [`RecordingIo`] that is ready at once
pub struct FakeTerminal {
    pub io: Arc<RecordingIo>,
    input: Mutex<Option<mpsc::Receiver<TerminalEvent>>>,
    /// Kept so the session does not see its input close
    pub input_tx: mpsc::Sender<TerminalEvent>,
}

impl FakeTerminal {
    pub fn new() -> Self {
        let (input_tx, input) = mpsc::channel(16);
        Self {
            io: Arc::new(RecordingIo::default()),
            input: Mutex::new(Some(input)),
            input_tx,
        }
    }
}

impl TerminalFactory for FakeTerminal {
    fn decorate(&self) -> Result<DecoratedTerminal> {
        let events = self
            .input
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| LauncherError::TerminalError("already decorated".to_string()))?;
        let (ready_tx, ready) = oneshot::channel();
        let _ = ready_tx.send(());
        Ok(DecoratedTerminal {
            io: self.io.clone(),
            events,
            ready,
        })
    }
}

struct ChannelPort(mpsc::UnboundedSender<OutboundMessage>);

impl EnginePort for ChannelPort {
    fn post_message(&self, message: &OutboundMessage) -> Result<()> {
        self.0
            .send(message.clone())
            .map_err(|_| LauncherError::EngineError("engine input closed".to_string()))
    }
}

/// Engine stand-in: records inserted elements and posted messages, and
/// replays a fixed list of lifecycle events on insertion.
pub struct FakeEngine {
    pub inserted: Mutex<Vec<PluginElement>>,
    posted: mpsc::UnboundedSender<OutboundMessage>,
    script: Vec<EngineEvent>,
    events: Mutex<Option<mpsc::UnboundedSender<EngineEvent>>>,
}

impl FakeEngine {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<OutboundMessage>) {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<EngineEvent>) -> (Arc<Self>, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (posted, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Self {
            inserted: Mutex::new(Vec::new()),
            posted,
            script,
            events: Mutex::new(None),
        });
        (engine, rx)
    }

    /// Raise an event on the most recently inserted engine
    pub fn emit(&self, event: EngineEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

impl EngineLoader for FakeEngine {
    fn insert(&self, element: &PluginElement) -> EngineHandle {
        self.inserted.lock().unwrap().push(element.clone());

        let (tx, events) = mpsc::unbounded_channel();
        for event in &self.script {
            let _ = tx.send(event.clone());
        }
        *self.events.lock().unwrap() = Some(tx);

        EngineHandle {
            port: Arc::new(ChannelPort(self.posted.clone())),
            events,
        }
    }
}

/// Secret store that counts lookups and can be told to fail
#[derive(Default)]
pub struct CountingStore {
    entries: Mutex<HashMap<String, String>>,
    pub lookups: Mutex<Vec<String>>,
    pub fail: bool,
}

impl CountingStore {
    pub fn with_entry(name: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.lock().unwrap().insert(name.to_string(), value.to_string());
        store
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        self.lookups.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(LauncherError::ConfigError("store unavailable".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        self.entries.lock().unwrap().insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.entries.lock().unwrap().remove(name).is_some())
    }
}

/// Wait for the next posted message, failing the test after a few seconds
pub async fn next_posted(rx: &mut mpsc::UnboundedReceiver<OutboundMessage>) -> OutboundMessage {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a posted message")
        .expect("posted message channel closed")
}
