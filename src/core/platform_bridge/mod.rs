//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the winit platform layer with the app shell on the core thread.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{CoreSignal, EventCollector, TickControl};
pub(crate) use interface::{PlatformError, PlatformEvent};
