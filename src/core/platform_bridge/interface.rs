//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// Defines the contract for communication between platform and core threads.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::PointerEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core over the crossbeam channel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Pointer input gathered during one platform frame.
    ///
    /// `discrete` keeps presses and releases in arrival order,
    /// `continuous` holds the coalesced move (at most one).
    Inputs {
        discrete: Vec<PointerEvent>,
        continuous: Vec<PointerEvent>,
    },

    /// Window lost focus or the app was suspended.
    Suspended,

    /// Window regained focus or the app was resumed.
    Resumed,

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, Error)]
pub(crate) enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::EventLoopCreation("no display".into());
        assert_eq!(err.to_string(), "Event loop creation failed: no display");
    }
}
