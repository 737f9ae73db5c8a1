use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal input as the prompt host consumes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Background reader that forwards crossterm events into a tokio channel.
///
/// crossterm's `read` blocks, so it runs on a dedicated thread. The thread
/// exits once the reader is dropped or the terminal stops answering, and
/// [`EventReader::next`] then returns `None`.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<TermEvent>,
}

impl EventReader {
    pub fn spawn(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || pump(tx, || event::poll(tick_rate), event::read));

        Self { rx }
    }

    /// Reader fed from an existing channel instead of the terminal
    pub fn from_channel(rx: mpsc::UnboundedReceiver<TermEvent>) -> Self {
        Self { rx }
    }

    /// Next event, `None` once the input thread has stopped. Cancel safe.
    pub async fn next(&mut self) -> Option<TermEvent> {
        self.rx.recv().await
    }
}

/// Forward terminal input until the receiver goes away or the terminal fails
fn pump(
    tx: mpsc::UnboundedSender<TermEvent>,
    mut poll: impl FnMut() -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<event::Event>,
) {
    loop {
        let next = match poll() {
            Ok(true) => match read() {
                Ok(raw) => translate(raw),
                Err(_) => break,
            },
            Ok(false) => Some(TermEvent::Tick),
            // a failing poll fails every time (e.g. the tty hung up)
            Err(_) => break,
        };
        if let Some(next) = next {
            if tx.send(next).is_err() {
                break;
            }
        }
    }
}

/// Keep key presses and resizes; drop key releases, mouse and focus events
fn translate(raw: event::Event) -> Option<TermEvent> {
    match raw {
        event::Event::Key(key) if key.kind != KeyEventKind::Release => Some(TermEvent::Key(key)),
        event::Event::Resize(_, _) => Some(TermEvent::Resize),
        _ => None,
    }
}
