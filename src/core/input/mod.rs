//=========================================================================
// Input
//=========================================================================
//
// Pointer input model shared by the platform layer and the core thread.
//
//=========================================================================

pub mod event;

pub use event::{PointerEvent, PointerPhase};
