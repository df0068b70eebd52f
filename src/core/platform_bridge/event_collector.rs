//=========================================================================
// Event Collector
//=========================================================================
//
// Platform event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → signals → TickControl
//
// Bounded polling prevents starvation. Idle sleep reduces CPU usage.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::PointerEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== CoreSignal ==========================================================

/// One unit of platform input for the app shell, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CoreSignal {
    Pointer(PointerEvent),
    Suspended,
    Resumed,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded polling.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    signals: Vec<CoreSignal>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            signals: Vec::with_capacity(16),
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        const MAX_EVENTS_PER_FRAME: usize = 100;
        const IDLE_SLEEP_MS: u64 = 10;

        self.signals.clear();
        let mut had_event = false;
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    had_event = true;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        }

        if !had_event {
            thread::sleep(Duration::from_millis(IDLE_SLEEP_MS));
        }

        TickControl::Continue
    }

    /// Signals collected this frame.
    pub(crate) fn signals(&self) -> &[CoreSignal] {
        &self.signals
    }

    /// Takes the collected signals, leaving an empty vec.
    pub(crate) fn take_signals(&mut self) -> Vec<CoreSignal> {
        std::mem::take(&mut self.signals)
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                self.signals
                    .extend(discrete.into_iter().chain(continuous).map(CoreSignal::Pointer));
                TickControl::Continue
            }
            PlatformEvent::Suspended => {
                self.signals.push(CoreSignal::Suspended);
                TickControl::Continue
            }
            PlatformEvent::Resumed => {
                self.signals.push(CoreSignal::Resumed);
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
