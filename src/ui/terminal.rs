use crate::ui::keys::encode_key_event;
use crate::utils::error::{LauncherError, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, queue, style::Print, terminal::SetTitle};
use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_QUEUE_DEPTH: usize = 256;

/// Output side of a terminal widget
pub trait TerminalIo: Send + Sync {
    /// Write text to the screen without any transformation
    fn print(&self, text: &str);

    fn set_cursor_position(&self, row: u16, column: u16);

    fn set_cursor_visible(&self, visible: bool);

    fn set_title(&self, title: &str);
}

/// Input reported by a terminal widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// Bytes produced by a key press
    Keystroke(String),
    /// A whole string sent at once, e.g. a paste
    SendString(String),
    /// New size in cells
    Resize { width: u16, height: u16 },
}

/// A terminal widget attached to its container
pub struct DecoratedTerminal {
    pub io: Arc<dyn TerminalIo>,
    pub events: mpsc::Receiver<TerminalEvent>,
    /// Fires once when the widget can be used
    pub ready: oneshot::Receiver<()>,
}

/// Creates terminal widgets
pub trait TerminalFactory {
    fn decorate(&self) -> Result<DecoratedTerminal>;
}

/// Terminal widget on the controlling terminal, in raw mode
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl TerminalFactory for CrosstermTerminal {
    fn decorate(&self) -> Result<DecoratedTerminal> {
        let guard = RawModeGuard::enable()?;
        let io = Arc::new(CrosstermIo {
            out: Mutex::new(std::io::stdout()),
            _raw: guard,
        });

        let (event_tx, events) = mpsc::channel(INPUT_QUEUE_DEPTH);
        let (ready_tx, ready) = oneshot::channel();

        std::thread::Builder::new()
            .name("terminal-input".to_string())
            .spawn(move || input_loop(event_tx, ready_tx))?;

        Ok(DecoratedTerminal { io, events, ready })
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| LauncherError::TerminalError(format!("failed to enable raw mode: {}", e)))?;
        if let Err(e) = execute!(std::io::stdout(), EnableBracketedPaste) {
            tracing::warn!("Bracketed paste unavailable: {}", e);
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), DisableBracketedPaste, cursor::Show);
        let _ = disable_raw_mode();
    }
}

struct CrosstermIo {
    out: Mutex<Stdout>,
    _raw: RawModeGuard,
}

impl CrosstermIo {
    fn with_out(&self, what: &str, f: impl FnOnce(&mut Stdout) -> std::io::Result<()>) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = f(&mut *out).and_then(|_| out.flush()) {
            tracing::warn!("Terminal {} failed: {}", what, e);
        }
    }
}

impl TerminalIo for CrosstermIo {
    fn print(&self, text: &str) {
        self.with_out("print", |out| queue!(out, Print(text)));
    }

    fn set_cursor_position(&self, row: u16, column: u16) {
        self.with_out("cursor move", |out| queue!(out, cursor::MoveTo(column, row)));
    }

    fn set_cursor_visible(&self, visible: bool) {
        self.with_out("cursor visibility", |out| {
            if visible {
                queue!(out, cursor::Show)
            } else {
                queue!(out, cursor::Hide)
            }
        });
    }

    fn set_title(&self, title: &str) {
        self.with_out("title", |out| queue!(out, SetTitle(title)));
    }
}

fn input_loop(events: mpsc::Sender<TerminalEvent>, ready: oneshot::Sender<()>) {
    let _ = ready.send(());

    match crossterm::terminal::size() {
        Ok((width, height)) => {
            if events.blocking_send(TerminalEvent::Resize { width, height }).is_err() {
                return;
            }
        }
        Err(e) => tracing::warn!("Could not read terminal size: {}", e),
    }

    while !events.is_closed() {
        match event::poll(INPUT_POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                tracing::error!("Terminal input failed: {}", e);
                break;
            }
        }

        let translated = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                encode_key_event(&key).map(TerminalEvent::Keystroke)
            }
            Ok(Event::Paste(text)) => Some(TerminalEvent::SendString(text)),
            Ok(Event::Resize(width, height)) => Some(TerminalEvent::Resize { width, height }),
            Ok(_) => None,
            Err(e) => {
                tracing::error!("Terminal input failed: {}", e);
                break;
            }
        };

        if let Some(event) = translated {
            if events.blocking_send(event).is_err() {
                break;
            }
        }
    }

    tracing::debug!("Terminal input reader stopped");
}
