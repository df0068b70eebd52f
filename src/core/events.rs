//=========================================================================
// App Events
//=========================================================================
//
// One-way notification channel from scenes and widgets to the app shell.
//
// Architecture:
//   SceneContainer ──┐
//                    ├─► EventSender ──► crossbeam (unbounded) ──► AppShell
//   WidgetContainer ─┘                                              drain per tick
//
// Firing never blocks and returns nothing the sender could depend on.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{trace, warn};

//=== Event Types =========================================================

/// Who fired the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Scene,
    Widget,
}

/// Optional payload carried with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParameter {
    Index(i64),
    Text(String),
    Flag(bool),
}

/// Request from a scene or widget for an app-level action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEvent {
    pub source: EventSource,
    /// Name of the firing scene or widget.
    pub sender: String,
    pub name: String,
    pub parameter: Option<EventParameter>,
}

impl AppEvent {
    /// Text parameter, if the event carries one.
    pub fn text(&self) -> Option<&str> {
        match &self.parameter {
            Some(EventParameter::Text(text)) => Some(text),
            _ => None,
        }
    }
}

//=== Channel =============================================================

/// Creates a connected sender / receiver pair.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded();
    (EventSender { tx }, EventReceiver { rx })
}

/// Cloneable sending half handed to every scene and widget.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<AppEvent>,
}

impl EventSender {
    /// Sends `event` without waiting. A closed app is logged, not an error.
    pub fn fire(&self, event: AppEvent) {
        trace!(target: "app", "{:?} {} fired {}", event.source, event.sender, event.name);
        if self.tx.send(event).is_err() {
            warn!(target: "app", "App event receiver is gone, event dropped");
        }
    }
}

/// Receiving half owned by the app shell.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<AppEvent>,
}

impl EventReceiver {
    /// Takes every event queued so far.
    pub fn drain(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
