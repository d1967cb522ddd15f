use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Input to the drill loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived before the wait ran out.
    Tick,
}

/// Where the drill loop gets its input from
pub trait DrillEventSource: Send + 'static {
    /// Waits up to `timeout` for input; `None` if nothing arrived in time.
    fn wait(&self, timeout: Duration) -> Option<DrillEvent>;
}

/// Maps a terminal event to drill input. Key releases and repeats are
/// dropped so one physical press is one response.
fn translate(ev: CtEvent) -> Option<DrillEvent> {
    match ev {
        CtEvent::Key(key) if key.kind == KeyEventKind::Press => Some(DrillEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(DrillEvent::Resize),
        _ => None,
    }
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    inner: ChannelEventSource,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        // Stops after the first event once the loop has gone away.
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if let Some(ev) = translate(ev) {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            inner: ChannelEventSource::new(rx),
        }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillEventSource for CrosstermEventSource {
    fn wait(&self, timeout: Duration) -> Option<DrillEvent> {
        self.inner.wait(timeout)
    }
}

/// Events pushed through a channel; used headless and by the terminal reader
pub struct ChannelEventSource {
    rx: Receiver<DrillEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for ChannelEventSource {
    fn wait(&self, timeout: Duration) -> Option<DrillEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => None,
            // A dead sender would otherwise turn the loop into a busy spin.
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(timeout);
                None
            }
        }
    }
}

/// Pulls one event at a time for the drill loop, falling back to `Tick`.
pub struct Runner<E: DrillEventSource> {
    events: E,
    tick: Duration,
}

impl<E: DrillEventSource> Runner<E> {
    pub fn new(events: E, tick: Duration) -> Self {
        Self { events, tick }
    }

    /// Next event, or `Tick` after one quiet tick interval.
    pub fn step(&self) -> DrillEvent {
        self.step_until(None)
    }

    /// Like [`Runner::step`], but returns `Tick` no later than `wake_at`, so a
    /// step boundary is seen when it happens rather than up to a tick late.
    pub fn step_until(&self, wake_at: Option<Instant>) -> DrillEvent {
        let timeout = wake_at.map_or(self.tick, |at| {
            self.tick.min(at.saturating_duration_since(Instant::now()))
        });
        self.events.wait(timeout).unwrap_or(DrillEvent::Tick)
    }
}
